//! Surface Module - two-feature risk sensitivity sweeps

pub mod cache;
pub mod grid;

pub use cache::{CacheStats, SurfaceCache, SurfaceKey};
pub use grid::{compute_surface, linspace, Surface, SweepError, SweepSpec, MIN_STEPS};
