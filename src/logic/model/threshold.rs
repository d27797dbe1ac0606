//! Risk Tier Thresholds
//!
//! Maps a probability onto the three ordinal risk tiers.
//! Boundary values belong to the higher tier.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("risk thresholds must satisfy 0 <= low < high <= 1 (got low={low}, high={high})")]
pub struct ThresholdError {
    pub low: f64,
    pub high: f64,
}

/// Threshold Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierThresholds {
    low: f64,
    high: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { low: 0.2, high: 0.5 }
    }
}

impl TierThresholds {
    pub fn new(low: f64, high: f64) -> Result<Self, ThresholdError> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(low) || !in_unit(high) || low >= high {
            return Err(ThresholdError { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn tier(&self, probability: f64) -> RiskTier {
        if probability < self.low {
            RiskTier::Low
        } else if probability < self.high {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }
}
