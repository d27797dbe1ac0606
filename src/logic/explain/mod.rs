//! Explain Module - per-prediction feature contributions
//!
//! Two strategies tried in order: Shapley attribution on the base model
//! (needs a background sample), then reference ablation on the primary model.

pub mod ablation;
pub mod attribution;
pub mod engine;
pub mod types;

pub use ablation::{ablation_contributions, AblationStrategy};
pub use attribution::{AttributionError, AttributionStrategy, Attributor, PermutationAttributor};
pub use engine::{rank, ExplainInput, ExplanationEngine, ExplanationStrategy, TOP_FEATURES};
pub use types::{Direction, ExplainMethod, ExplainResult, FeatureContribution, RawContributions};
