//! Prediction request/response models

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::logic::features::{FeatureRow, FeatureValue};
use crate::logic::model::RiskTier;

/// One patient encounter as submitted by the client.
///
/// Ranges and enumerations are checked on the feature row, against the
/// schema in `logic::features`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub race: String,
    pub gender: String,
    pub age: String,
    pub admission_type_id: i64,
    pub discharge_disposition_id: i64,
    pub admission_source_id: i64,
    pub time_in_hospital: i64,
    pub num_lab_procedures: i64,
    pub num_procedures: i64,
    pub num_medications: i64,
    pub number_outpatient: i64,
    pub number_emergency: i64,
    pub number_inpatient: i64,
    #[serde(rename = "A1Cresult")]
    pub a1c_result: String,
    pub metformin: String,
    pub insulin: String,
    pub change: String,
    #[serde(rename = "diabetesMed")]
    pub diabetes_med: String,
}

impl PredictRequest {
    /// Feature row in training column order
    pub fn to_row(&self) -> FeatureRow {
        let num = |v: i64| FeatureValue::Number(v as f64);
        FeatureRow::from_pairs([
            ("race", FeatureValue::category(&self.race)),
            ("gender", FeatureValue::category(&self.gender)),
            ("age", FeatureValue::category(&self.age)),
            ("admission_type_id", num(self.admission_type_id)),
            ("discharge_disposition_id", num(self.discharge_disposition_id)),
            ("admission_source_id", num(self.admission_source_id)),
            ("time_in_hospital", num(self.time_in_hospital)),
            ("num_lab_procedures", num(self.num_lab_procedures)),
            ("num_procedures", num(self.num_procedures)),
            ("num_medications", num(self.num_medications)),
            ("number_outpatient", num(self.number_outpatient)),
            ("number_emergency", num(self.number_emergency)),
            ("number_inpatient", num(self.number_inpatient)),
            ("A1Cresult", FeatureValue::category(&self.a1c_result)),
            ("metformin", FeatureValue::category(&self.metformin)),
            ("insulin", FeatureValue::category(&self.insulin)),
            ("change", FeatureValue::category(&self.change)),
            ("diabetesMed", FeatureValue::category(&self.diabetes_med)),
        ])
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchPredictRequest {
    #[validate(length(min = 1, max = 500, message = "Batch must contain between 1 and 500 rows"))]
    pub rows: Vec<PredictRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchRowResult {
    /// 1-based position in the submitted batch
    pub row: usize,
    pub probability: f64,
    pub risk_tier: RiskTier,
    pub risk_pct: String,
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    /// Mean probability as a percentage, 1 dp
    pub avg_risk: f64,
}

#[derive(Debug, Serialize)]
pub struct BatchPredictResponse {
    pub results: Vec<BatchRowResult>,
    pub summary: BatchSummary,
}

impl BatchPredictResponse {
    pub fn from_scores(scores: &[(f64, RiskTier)]) -> Self {
        let results: Vec<BatchRowResult> = scores
            .iter()
            .enumerate()
            .map(|(i, (p, tier))| BatchRowResult {
                row: i + 1,
                probability: (p * 10_000.0).round() / 10_000.0,
                risk_tier: *tier,
                risk_pct: format!("{:.1}%", p * 100.0),
            })
            .collect();

        let count = |tier: RiskTier| scores.iter().filter(|(_, t)| *t == tier).count();
        let mean = if scores.is_empty() {
            0.0
        } else {
            scores.iter().map(|(p, _)| p).sum::<f64>() / scores.len() as f64
        };

        Self {
            summary: BatchSummary {
                total: results.len(),
                high: count(RiskTier::High),
                medium: count(RiskTier::Medium),
                low: count(RiskTier::Low),
                avg_risk: (mean * 1000.0).round() / 10.0,
            },
            results,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SurfaceQuery {
    pub feature_x: String,
    pub feature_y: String,
    /// Signed so out-of-range values reach the sweep check
    #[serde(default = "default_steps")]
    pub steps: i64,
}

fn default_steps() -> i64 {
    25
}
