//! API models

pub mod prediction;
pub mod report;

pub use prediction::*;
pub use report::*;
