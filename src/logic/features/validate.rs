//! Feature validation against the declared schema

use thiserror::Error;

use super::{FeatureRow, CATEGORICAL_FEATURES, NUMERIC_FEATURES};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(String),

    #[error("{0} must be one of the allowed categories")]
    UnknownCategory(String),

    #[error("{0} must be numeric")]
    NotNumeric(String),

    #[error("{feature} must be >= {low}")]
    BelowRange { feature: String, low: f64 },

    #[error("{feature} must be <= {high}")]
    AboveRange { feature: String, high: f64 },
}

/// Check categorical fields against their fixed enumerations
pub fn validate_categoricals(row: &FeatureRow) -> Result<(), ValidationError> {
    for (feature, levels) in CATEGORICAL_FEATURES.iter() {
        let value = row
            .get(feature)
            .and_then(|v| v.as_category())
            .ok_or_else(|| ValidationError::UnknownCategory(feature.to_string()))?;
        if !levels.contains(&value) {
            return Err(ValidationError::UnknownCategory(feature.to_string()));
        }
    }
    Ok(())
}

/// Full schema check: enumerations plus numeric presence and range
pub fn validate_features(row: &FeatureRow) -> Result<(), ValidationError> {
    validate_categoricals(row)?;

    for feature in NUMERIC_FEATURES.iter() {
        let value = row
            .get(feature.name)
            .ok_or_else(|| ValidationError::Missing(feature.name.to_string()))?
            .as_number()
            .ok_or_else(|| ValidationError::NotNumeric(feature.name.to_string()))?;

        if value < feature.low {
            return Err(ValidationError::BelowRange { feature: feature.name.to_string(), low: feature.low });
        }
        if value > feature.high {
            return Err(ValidationError::AboveRange { feature: feature.name.to_string(), high: feature.high });
        }
    }
    Ok(())
}
