//! Risk surface sweep - validate the request, build the grid, score it

use serde::Serialize;
use thiserror::Error;

use crate::logic::features::{numeric_feature, FeatureRow, FeatureValue, NumericFeature};
use crate::logic::model::{Classifier, ModelError};

pub const MIN_STEPS: usize = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SweepError {
    #[error("feature_x and feature_y must be numeric features")]
    NotNumeric,

    #[error("feature_x and feature_y must be different")]
    SameFeature,

    #[error("steps must be between {min} and {max}")]
    StepsOutOfRange { min: usize, max: usize },
}

/// A sweep request that has passed every precondition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSpec {
    pub x: &'static NumericFeature,
    pub y: &'static NumericFeature,
    pub steps: usize,
}

impl SweepSpec {
    /// Checks run in order: numeric features, distinct, step bounds.
    /// `steps` is signed so negative requests fail here like any other bad count.
    pub fn validate(feature_x: &str, feature_y: &str, steps: i64, max_steps: usize) -> Result<Self, SweepError> {
        let (x, y) = match (numeric_feature(feature_x), numeric_feature(feature_y)) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(SweepError::NotNumeric),
        };
        if x.name == y.name {
            return Err(SweepError::SameFeature);
        }
        let out_of_range = SweepError::StepsOutOfRange { min: MIN_STEPS, max: max_steps };
        let steps = usize::try_from(steps).map_err(|_| out_of_range.clone())?;
        if steps < MIN_STEPS || steps > max_steps {
            return Err(out_of_range);
        }
        Ok(Self { x, y, steps })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surface {
    pub feature_x: String,
    pub feature_y: String,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    /// z_matrix[i][j] is the probability at (x_values[i], y_values[j])
    pub z_matrix: Vec<Vec<f64>>,
}

/// `steps` evenly spaced samples, first = low and last = high exactly
pub fn linspace(low: f64, high: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let step = (high - low) / (steps - 1) as f64;
            (0..steps)
                .map(|i| if i == steps - 1 { high } else { low + step * i as f64 })
                .collect()
        }
    }
}

/// Score every grid point (steps² model calls)
pub fn compute_surface(
    model: &dyn Classifier,
    baseline: &FeatureRow,
    spec: &SweepSpec,
) -> Result<Surface, ModelError> {
    let x_values = linspace(spec.x.low, spec.x.high, spec.steps);
    let y_values = linspace(spec.y.low, spec.y.high, spec.steps);

    let mut grid = Vec::with_capacity(spec.steps * spec.steps);
    for &x in &x_values {
        for &y in &y_values {
            let mut row = baseline.clone();
            row.set(spec.x.name, FeatureValue::Number(x));
            row.set(spec.y.name, FeatureValue::Number(y));
            grid.push(row);
        }
    }

    let probs = model.predict_proba_batch(&grid)?;
    let z_matrix = probs.chunks(spec.steps).map(|chunk| chunk.to_vec()).collect();

    Ok(Surface {
        feature_x: spec.x.name.to_string(),
        feature_y: spec.y.name.to_string(),
        x_values,
        y_values,
        z_matrix,
    })
}
