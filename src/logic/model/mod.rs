//! Model Module - scoring, artifacts and risk tiers
//!
//! Scoring sits behind the `Classifier` trait so the explanation and surface
//! code never depends on the concrete artifact format.

pub mod artifacts;
pub mod classifier;
pub mod scorecard;
pub mod threshold;

// Re-export common types
pub use artifacts::{ArtifactCache, ArtifactError, ArtifactPaths, BackgroundSample, FeatureReference, ModelArtifact, ModelVersion};
pub use classifier::{Classifier, ModelError};
pub use scorecard::ScorecardModel;
pub use threshold::{RiskTier, ThresholdError, TierThresholds};
