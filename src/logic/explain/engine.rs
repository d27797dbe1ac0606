use super::ablation::AblationStrategy;
use super::attribution::{AttributionStrategy, Attributor};
use super::types::{Direction, ExplainMethod, ExplainResult, FeatureContribution, RawContributions};
use crate::logic::features::FeatureRow;
use crate::logic::model::{BackgroundSample, Classifier, FeatureReference, ModelError};

/// Number of contributions reported per prediction
pub const TOP_FEATURES: usize = 5;

/// Everything a strategy may draw on for one explanation
pub struct ExplainInput<'a> {
    pub model: &'a dyn Classifier,
    pub base_model: Option<&'a dyn Classifier>,
    pub row: &'a FeatureRow,
    pub reference: &'a FeatureReference,
    pub background: &'a BackgroundSample,
}

/// One way of attributing a prediction to its features.
///
/// `Ok(None)` means "not available here", the engine moves on.
/// `Err` is reserved for the model failing to score at all.
pub trait ExplanationStrategy: Send + Sync {
    fn method(&self) -> ExplainMethod;
    fn contributions(&self, input: &ExplainInput<'_>) -> Result<Option<RawContributions>, ModelError>;
}

/// Ordered strategy list, first result wins
pub struct ExplanationEngine {
    strategies: Vec<Box<dyn ExplanationStrategy>>,
}

impl ExplanationEngine {
    pub fn new(strategies: Vec<Box<dyn ExplanationStrategy>>) -> Self {
        Self { strategies }
    }

    /// Attribution first, ablation as the fallback
    pub fn with_attributor(attributor: impl Attributor + 'static) -> Self {
        Self::new(vec![
            Box::new(AttributionStrategy::new(attributor)),
            Box::new(AblationStrategy),
        ])
    }

    pub fn ablation_only() -> Self {
        Self::new(vec![Box::new(AblationStrategy)])
    }

    pub fn explain(&self, input: &ExplainInput<'_>) -> Result<ExplainResult, ModelError> {
        for strategy in &self.strategies {
            if let Some(raw) = strategy.contributions(input)? {
                return Ok(ExplainResult {
                    contributions: rank(raw),
                    method: strategy.method(),
                });
            }
        }

        tracing::warn!("No explanation strategy produced a result");
        Ok(ExplainResult {
            contributions: Vec::new(),
            method: ExplainMethod::Ablation,
        })
    }
}

/// Sort by |contribution| DESC (stable, so ties keep feature order),
/// keep the top 5 and tag direction. NaN sorts first under `total_cmp`.
pub fn rank(mut raw: RawContributions) -> Vec<FeatureContribution> {
    raw.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    raw.truncate(TOP_FEATURES);

    raw.into_iter()
        .map(|(feature, contribution)| FeatureContribution {
            direction: Direction::from_contribution(contribution),
            feature,
            contribution,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::logic::explain::PermutationAttributor;
    use crate::logic::features::FeatureValue;
    use crate::logic::testing::{BrokenModel, CountingModel, LinearModel};

    fn wide_row() -> FeatureRow {
        let mut row = FeatureRow::new();
        for (i, name) in ["f0", "f1", "f2", "f3", "f4", "f5", "f6", "f7"].iter().enumerate() {
            row.set(name, FeatureValue::Number(i as f64));
        }
        row
    }

    fn zero_reference() -> FeatureReference {
        wide_row().names().map(|n| (n.to_string(), FeatureValue::Number(0.0))).collect()
    }

    fn wide_model() -> LinearModel {
        LinearModel::new(&[
            ("f0", 0.3), ("f1", -0.05), ("f2", 0.02), ("f3", -0.01),
            ("f4", 0.004), ("f5", 0.01), ("f6", -0.02), ("f7", 0.001),
        ])
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        let raw = vec![
            ("a".to_string(), 0.01),
            ("b".to_string(), -0.3),
            ("c".to_string(), 0.0),
            ("d".to_string(), 0.2),
            ("e".to_string(), -0.01),
            ("f".to_string(), 0.05),
            ("g".to_string(), 0.001),
        ];
        let ranked = rank(raw);

        let names: Vec<&str> = ranked.iter().map(|c| c.feature.as_str()).collect();
        // a and e tie on |0.01|: original order wins
        assert_eq!(names, vec!["b", "d", "f", "a", "e"]);
        assert_eq!(ranked[0].direction, Direction::DecreasesRisk);
        assert_eq!(ranked[1].direction, Direction::IncreasesRisk);
    }

    #[test]
    fn test_rank_tolerates_nan() {
        let raw = vec![
            ("a".to_string(), 0.1),
            ("b".to_string(), f64::NAN),
            ("c".to_string(), -0.2),
            ("d".to_string(), 0.1),
        ];
        let ranked = rank(raw);

        let names: Vec<&str> = ranked.iter().map(|c| c.feature.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a", "d"]);
        assert_eq!(ranked[0].direction, Direction::Neutral);
    }

    #[test]
    fn test_zero_is_neutral() {
        let ranked = rank(vec![("x".to_string(), 0.0), ("y".to_string(), -0.0)]);
        assert!(ranked.iter().all(|c| c.direction == Direction::Neutral));
    }

    #[test]
    fn test_falls_back_to_ablation_without_base_model() {
        let engine = ExplanationEngine::with_attributor(PermutationAttributor::default());
        let model = wide_model();
        let row = wide_row();
        let reference = zero_reference();
        let background = BackgroundSample::default();

        let result = engine
            .explain(&ExplainInput {
                model: &model,
                base_model: None,
                row: &row,
                reference: &reference,
                background: &background,
            })
            .unwrap();

        assert_eq!(result.method, ExplainMethod::Ablation);
        assert_eq!(result.contributions.len(), TOP_FEATURES);
        for pair in result.contributions.windows(2) {
            assert!(pair[0].contribution.abs() >= pair[1].contribution.abs());
        }
        // f0 has value 0, so equals its reference
        assert!(result.contributions.iter().all(|c| c.feature != "f0"));
    }

    #[test]
    fn test_attribution_preferred_when_available() {
        let engine = ExplanationEngine::with_attributor(PermutationAttributor::default());
        let model = CountingModel::new(wide_model());
        let base = wide_model();
        let row = wide_row();
        let reference = zero_reference();
        let background = BackgroundSample::new(vec![
            row.names().map(|n| (n.to_string(), FeatureValue::Number(1.0))).collect::<HashMap<_, _>>(),
        ]);

        let result = engine
            .explain(&ExplainInput {
                model: &model,
                base_model: Some(&base),
                row: &row,
                reference: &reference,
                background: &background,
            })
            .unwrap();

        assert_eq!(result.method, ExplainMethod::Attribution);
        assert_eq!(model.calls(), 0);
        // f1 sits at the background value
        assert!(result.contributions.iter().all(|c| c.feature != "f1"));
    }

    #[test]
    fn test_broken_base_model_falls_through() {
        let engine = ExplanationEngine::with_attributor(PermutationAttributor::default());
        let model = wide_model();
        let row = wide_row();
        let reference = zero_reference();
        let background = BackgroundSample::new(vec![
            row.names().map(|n| (n.to_string(), FeatureValue::Number(1.0))).collect::<HashMap<_, _>>(),
        ]);

        let result = engine
            .explain(&ExplainInput {
                model: &model,
                base_model: Some(&BrokenModel),
                row: &row,
                reference: &reference,
                background: &background,
            })
            .unwrap();

        assert_eq!(result.method, ExplainMethod::Ablation);
    }

    #[test]
    fn test_model_failure_propagates() {
        let engine = ExplanationEngine::ablation_only();
        let row = wide_row();
        let reference = zero_reference();
        let background = BackgroundSample::default();

        let result = engine.explain(&ExplainInput {
            model: &BrokenModel,
            base_model: None,
            row: &row,
            reference: &reference,
            background: &background,
        });
        assert!(result.is_err());
    }
}
