//! Attribution contributions - Shapley values against a background sample
//!
//! The capability sits behind `Attributor`. The shipped estimator samples
//! feature orderings (antithetic pairs, seeded) and walks each background row
//! towards the explained row one feature at a time, crediting each feature
//! with the probability change it causes. Per ordering the credits telescope,
//! so the totals always sum to P(row) - mean P(background).

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

use super::engine::{ExplainInput, ExplanationStrategy};
use super::types::{ExplainMethod, RawContributions};
use crate::logic::features::FeatureRow;
use crate::logic::model::{BackgroundSample, Classifier, ModelError};

#[derive(Debug, Error)]
pub enum AttributionError {
    #[error("background sample is empty")]
    EmptyBackground,

    #[error("background row {0} is missing model features")]
    IncompleteBackground(usize),

    #[error("attribution for {0} is not finite")]
    NonFinite(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Pluggable attribution capability
pub trait Attributor: Send + Sync {
    fn attribute(
        &self,
        model: &dyn Classifier,
        background: &BackgroundSample,
        row: &FeatureRow,
    ) -> Result<RawContributions, AttributionError>;
}

/// Permutation-sampling Shapley estimator
#[derive(Debug, Clone)]
pub struct PermutationAttributor {
    pub permutations: usize,
    pub max_background: usize,
    pub seed: u64,
}

impl Default for PermutationAttributor {
    fn default() -> Self {
        Self {
            permutations: 8,
            max_background: 50,
            seed: 42,
        }
    }
}

impl Attributor for PermutationAttributor {
    fn attribute(
        &self,
        model: &dyn Classifier,
        background: &BackgroundSample,
        row: &FeatureRow,
    ) -> Result<RawContributions, AttributionError> {
        let bg_count = background.len().min(self.max_background.max(1));
        if bg_count == 0 {
            return Err(AttributionError::EmptyBackground);
        }

        let baselines = (0..bg_count)
            .map(|b| background.aligned_row(b, row).ok_or(AttributionError::IncompleteBackground(b)))
            .collect::<Result<Vec<_>, _>>()?;

        let n = row.len();
        let permutations = self.permutations.max(1);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut order: Vec<usize> = (0..n).collect();
        let mut phi = vec![0.0; n];

        for p in 0..permutations {
            // Odd passes replay the previous ordering backwards
            if p % 2 == 0 {
                order.shuffle(&mut rng);
            } else {
                order.reverse();
            }

            for baseline in &baselines {
                let mut current = baseline.clone();
                let mut prev = model.predict_proba(&current)?;
                for &i in &order {
                    if let Some(value) = row.value_at(i) {
                        current.set_at(i, value.clone());
                    }
                    let next = model.predict_proba(&current)?;
                    phi[i] += next - prev;
                    prev = next;
                }
            }
        }

        let scale = 1.0 / (permutations * bg_count) as f64;
        row.names()
            .zip(phi)
            .map(|(name, total)| {
                let value = total * scale;
                if value.is_finite() {
                    Ok((name.to_string(), value))
                } else {
                    Err(AttributionError::NonFinite(name.to_string()))
                }
            })
            .collect()
    }
}

/// Preferred strategy: needs a base model and a non-empty background.
/// Any failure means "no result" so the engine falls through.
pub struct AttributionStrategy {
    attributor: Box<dyn Attributor>,
}

impl AttributionStrategy {
    pub fn new(attributor: impl Attributor + 'static) -> Self {
        Self { attributor: Box::new(attributor) }
    }
}

impl ExplanationStrategy for AttributionStrategy {
    fn method(&self) -> ExplainMethod {
        ExplainMethod::Attribution
    }

    fn contributions(&self, input: &ExplainInput<'_>) -> Result<Option<RawContributions>, ModelError> {
        let Some(base_model) = input.base_model else {
            return Ok(None);
        };
        if input.background.is_empty() {
            return Ok(None);
        }

        match self.attributor.attribute(base_model, input.background, input.row) {
            Ok(contributions) => Ok(Some(contributions)),
            Err(e) => {
                tracing::debug!("Attribution unavailable ({}), falling back", e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::logic::features::FeatureValue;
    use crate::logic::testing::{BrokenModel, LinearModel};

    fn row() -> FeatureRow {
        FeatureRow::from_pairs([
            ("a", FeatureValue::Number(3.0)),
            ("b", FeatureValue::Number(1.0)),
            ("c", FeatureValue::Number(-2.0)),
        ])
    }

    fn background() -> BackgroundSample {
        let make = |a: f64, b: f64, c: f64| {
            HashMap::from([
                ("a".to_string(), FeatureValue::Number(a)),
                ("b".to_string(), FeatureValue::Number(b)),
                ("c".to_string(), FeatureValue::Number(c)),
            ])
        };
        BackgroundSample::new(vec![make(0.0, 0.0, 0.0), make(1.0, 2.0, 0.0)])
    }

    #[test]
    fn test_efficiency() {
        let model = LinearModel::new(&[("a", 0.05), ("b", -0.1), ("c", 0.02)]);
        let contributions = PermutationAttributor::default()
            .attribute(&model, &background(), &row())
            .unwrap();

        let total: f64 = contributions.iter().map(|(_, v)| v).sum();
        let p_row = model.predict_proba(&row()).unwrap();
        let p_bg = (0..2)
            .map(|b| model.predict_proba(&background().aligned_row(b, &row()).unwrap()).unwrap())
            .sum::<f64>()
            / 2.0;
        assert!((total - (p_row - p_bg)).abs() < 1e-12);
    }

    #[test]
    fn test_linear_model_exact() {
        // Additive model: phi_i = w_i * (x_i - mean background x_i)
        let model = LinearModel::new(&[("a", 0.05), ("b", -0.1), ("c", 0.02)]);
        let contributions = PermutationAttributor::default()
            .attribute(&model, &background(), &row())
            .unwrap();

        let names: Vec<&str> = contributions.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!((contributions[0].1 - 0.05 * (3.0 - 0.5)).abs() < 1e-12);
        assert!((contributions[1].1 + 0.1 * (1.0 - 1.0)).abs() < 1e-12);
        assert!((contributions[2].1 - 0.02 * -2.0).abs() < 1e-12);
    }

    #[test]
    fn test_failures_are_errors() {
        let attributor = PermutationAttributor::default();
        let model = LinearModel::new(&[("a", 0.1)]);

        let empty = BackgroundSample::default();
        assert!(matches!(
            attributor.attribute(&model, &empty, &row()),
            Err(AttributionError::EmptyBackground)
        ));

        let partial = BackgroundSample::new(vec![HashMap::from([("a".to_string(), FeatureValue::Number(0.0))])]);
        assert!(matches!(
            attributor.attribute(&model, &partial, &row()),
            Err(AttributionError::IncompleteBackground(0))
        ));

        assert!(matches!(
            attributor.attribute(&BrokenModel, &background(), &row()),
            Err(AttributionError::Model(_))
        ));
    }
}
