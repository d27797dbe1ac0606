//! Precomputed report models (written by the training pipeline)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_version: String,
    pub training_date: String,
    pub feature_list: Vec<String>,
}

/// Fairness and evaluation reports share one shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: String,
    pub metrics: serde_json::Value,
}
