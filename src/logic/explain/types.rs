use serde::{Deserialize, Serialize};

/// Unranked per-feature contributions, in row order
pub type RawContributions = Vec<(String, f64)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    IncreasesRisk,
    DecreasesRisk,
    Neutral,
}

impl Direction {
    /// Exact sign, no epsilon
    pub fn from_contribution(value: f64) -> Self {
        if value > 0.0 {
            Direction::IncreasesRisk
        } else if value < 0.0 {
            Direction::DecreasesRisk
        } else {
            Direction::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: String,
    pub contribution: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplainMethod {
    Attribution,
    Ablation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResult {
    pub contributions: Vec<FeatureContribution>, // top 5, |contribution| DESC
    pub method: ExplainMethod,
}
