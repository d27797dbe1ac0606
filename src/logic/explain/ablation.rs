//! Ablation contributions - swap one feature for its reference value
//!
//! contribution(f) = P(row) - P(row with f set to its reference value).
//! Features without a reference keep their own value and score 0.
//! Costs N+1 model evaluations for N features.

use super::engine::{ExplainInput, ExplanationStrategy};
use super::types::{ExplainMethod, RawContributions};
use crate::logic::features::FeatureRow;
use crate::logic::model::{Classifier, FeatureReference, ModelError};

/// Returns the row's own probability alongside the per-feature deltas
pub fn ablation_contributions(
    model: &dyn Classifier,
    row: &FeatureRow,
    reference: &FeatureReference,
) -> Result<(f64, RawContributions), ModelError> {
    let base_prob = model.predict_proba(row)?;

    let mut contributions = Vec::with_capacity(row.len());
    for (feature, value) in row.iter() {
        let ref_value = reference.get(feature).unwrap_or(value).clone();
        let ablated = row.with_value(feature, ref_value);
        let ref_prob = model.predict_proba(&ablated)?;
        contributions.push((feature.to_string(), base_prob - ref_prob));
    }

    Ok((base_prob, contributions))
}

/// Fallback strategy: always produces a result unless the model cannot score
pub struct AblationStrategy;

impl ExplanationStrategy for AblationStrategy {
    fn method(&self) -> ExplainMethod {
        ExplainMethod::Ablation
    }

    fn contributions(&self, input: &ExplainInput<'_>) -> Result<Option<RawContributions>, ModelError> {
        let (_, contributions) = ablation_contributions(input.model, input.row, input.reference)?;
        Ok(Some(contributions))
    }
}
