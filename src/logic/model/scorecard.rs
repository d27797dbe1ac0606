//! Scorecard Model - logistic model exported by the training pipeline
//!
//! Numeric inputs are standardized (median-imputed when absent), categorical
//! inputs are one-hot levels. Unknown levels contribute nothing. An optional
//! Platt step turns the uncalibrated score into the calibrated probability.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::classifier::{sigmoid, Classifier, ModelError};
use crate::logic::features::{FeatureRow, FeatureValue};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericTerm {
    pub name: String,
    pub center: f64,
    pub scale: f64,
    pub weight: f64,
    /// Value used when the row has no entry
    pub impute: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalTerm {
    pub name: String,
    pub levels: HashMap<String, f64>,
}

/// Platt scaling applied to the raw log-odds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Calibration {
    pub slope: f64,
    pub intercept: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorecardModel {
    #[serde(default)]
    pub name: Option<String>,
    pub intercept: f64,
    #[serde(default)]
    pub numeric: Vec<NumericTerm>,
    #[serde(default)]
    pub categorical: Vec<CategoricalTerm>,
    #[serde(default)]
    pub calibration: Option<Calibration>,
}

impl ScorecardModel {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Uncalibrated log-odds
    pub fn decision_function(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        let mut z = self.intercept;

        for term in &self.numeric {
            let x = match row.get(&term.name) {
                Some(FeatureValue::Number(n)) => *n,
                Some(FeatureValue::Category(_)) => {
                    return Err(ModelError::ExpectedNumber(term.name.clone()))
                }
                None => term.impute,
            };
            let scale = if term.scale == 0.0 { 1.0 } else { term.scale };
            z += term.weight * (x - term.center) / scale;
        }

        for term in &self.categorical {
            match row.get(&term.name) {
                Some(FeatureValue::Category(level)) => {
                    z += term.levels.get(level).copied().unwrap_or(0.0);
                }
                Some(FeatureValue::Number(_)) => {
                    return Err(ModelError::ExpectedCategory(term.name.clone()))
                }
                None => {}
            }
        }

        Ok(z)
    }
}

impl Classifier for ScorecardModel {
    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        let z = self.decision_function(row)?;
        let p = match self.calibration {
            Some(c) => sigmoid(c.slope * z + c.intercept),
            None => sigmoid(z),
        };
        if p.is_finite() {
            Ok(p)
        } else {
            Err(ModelError::NonFinite)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(calibration: Option<Calibration>) -> ScorecardModel {
        ScorecardModel {
            name: Some("test".to_string()),
            intercept: -0.5,
            numeric: vec![NumericTerm {
                name: "time_in_hospital".to_string(),
                center: 4.0,
                scale: 2.0,
                weight: 1.0,
                impute: 4.0,
            }],
            categorical: vec![CategoricalTerm {
                name: "insulin".to_string(),
                levels: HashMap::from([("Up".to_string(), 0.5)]),
            }],
            calibration,
        }
    }

    #[test]
    fn test_logit_terms() {
        let row = FeatureRow::from_pairs([
            ("time_in_hospital", FeatureValue::Number(6.0)),
            ("insulin", FeatureValue::category("Up")),
        ]);
        // -0.5 + (6-4)/2 + 0.5 = 1.0
        let z = model(None).decision_function(&row).unwrap();
        assert!((z - 1.0).abs() < 1e-12);
        let p = model(None).predict_proba(&row).unwrap();
        assert!((p - sigmoid(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_and_unknown_inputs() {
        let row = FeatureRow::from_pairs([("insulin", FeatureValue::category("Sideways"))]);
        let z = model(None).decision_function(&row).unwrap();
        assert!((z + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_calibration_applied() {
        let row = FeatureRow::from_pairs([("time_in_hospital", FeatureValue::Number(4.0))]);
        let calibrated = model(Some(Calibration { slope: 2.0, intercept: 1.0 }));
        let p = calibrated.predict_proba(&row).unwrap();
        assert!((p - sigmoid(2.0 * -0.5 + 1.0)).abs() < 1e-12);
        assert!(calibrated.is_calibrated());
    }

    #[test]
    fn test_type_mismatch() {
        let row = FeatureRow::from_pairs([("time_in_hospital", FeatureValue::category("long"))]);
        assert_eq!(
            model(None).predict_proba(&row),
            Err(ModelError::ExpectedNumber("time_in_hospital".to_string()))
        );
    }

    #[test]
    fn test_parse_artifact() {
        let json = br#"{
            "intercept": 0.0,
            "numeric": [{"name": "num_medications", "center": 14, "scale": 8, "weight": 0.2, "impute": 14}],
            "categorical": [{"name": "race", "levels": {"Asian": -0.1}}]
        }"#;
        let model = ScorecardModel::from_json(json).unwrap();
        assert_eq!(model.numeric.len(), 1);
        assert!(!model.is_calibrated());
    }
}
