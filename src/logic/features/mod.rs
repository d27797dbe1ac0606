//! Feature Module - Model input schema and feature rows
//!
//! Declares the 18 model inputs in training order, their allowed values and
//! the baseline payload used for risk surface sweeps.

pub mod row;
pub mod validate;

pub use row::{FeatureRow, FeatureValue};
pub use validate::{validate_categoricals, validate_features, ValidationError};

// ============================================================================
// SCHEMA
// ============================================================================

/// Model inputs in the order the pipeline was trained on
pub const FEATURE_COLUMNS: [&str; 18] = [
    "race",
    "gender",
    "age",
    "admission_type_id",
    "discharge_disposition_id",
    "admission_source_id",
    "time_in_hospital",
    "num_lab_procedures",
    "num_procedures",
    "num_medications",
    "number_outpatient",
    "number_emergency",
    "number_inpatient",
    "A1Cresult",
    "metformin",
    "insulin",
    "change",
    "diabetesMed",
];

pub const RACE_VALUES: &[&str] = &["Caucasian", "AfricanAmerican", "Asian", "Hispanic", "Other", "Unknown"];
pub const GENDER_VALUES: &[&str] = &["Male", "Female", "Unknown/Invalid"];
pub const AGE_VALUES: &[&str] = &[
    "[0-10)", "[10-20)", "[20-30)", "[30-40)", "[40-50)",
    "[50-60)", "[60-70)", "[70-80)", "[80-90)", "[90-100)",
];
pub const A1C_VALUES: &[&str] = &["None", "Norm", ">7", ">8"];
pub const MED_STATUS_VALUES: &[&str] = &["No", "Steady", "Up", "Down"];
pub const MED_CHANGE_VALUES: &[&str] = &["No", "Ch"];
pub const DIABETES_MED_VALUES: &[&str] = &["Yes", "No"];

/// Categorical inputs and their allowed levels
pub const CATEGORICAL_FEATURES: [(&str, &[&str]); 8] = [
    ("race", RACE_VALUES),
    ("gender", GENDER_VALUES),
    ("age", AGE_VALUES),
    ("A1Cresult", A1C_VALUES),
    ("metformin", MED_STATUS_VALUES),
    ("insulin", MED_STATUS_VALUES),
    ("change", MED_CHANGE_VALUES),
    ("diabetesMed", DIABETES_MED_VALUES),
];

/// A numeric input with its inclusive declared range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericFeature {
    pub name: &'static str,
    pub low: f64,
    pub high: f64,
}

pub const NUMERIC_FEATURES: [NumericFeature; 10] = [
    NumericFeature { name: "admission_type_id", low: 1.0, high: 9.0 },
    NumericFeature { name: "discharge_disposition_id", low: 1.0, high: 30.0 },
    NumericFeature { name: "admission_source_id", low: 1.0, high: 25.0 },
    NumericFeature { name: "time_in_hospital", low: 1.0, high: 30.0 },
    NumericFeature { name: "num_lab_procedures", low: 0.0, high: 200.0 },
    NumericFeature { name: "num_procedures", low: 0.0, high: 50.0 },
    NumericFeature { name: "num_medications", low: 0.0, high: 100.0 },
    NumericFeature { name: "number_outpatient", low: 0.0, high: 50.0 },
    NumericFeature { name: "number_emergency", low: 0.0, high: 50.0 },
    NumericFeature { name: "number_inpatient", low: 0.0, high: 50.0 },
];

/// Look up a numeric feature's declared range
pub fn numeric_feature(name: &str) -> Option<&'static NumericFeature> {
    NUMERIC_FEATURES.iter().find(|f| f.name == name)
}

/// Allowed levels for a categorical feature
pub fn categorical_levels(name: &str) -> Option<&'static [&'static str]> {
    CATEGORICAL_FEATURES
        .iter()
        .find(|(feature, _)| *feature == name)
        .map(|(_, levels)| *levels)
}

/// Fixed payload every risk surface sweep starts from
pub fn surface_baseline() -> FeatureRow {
    FeatureRow::from_pairs([
        ("race", FeatureValue::category("Caucasian")),
        ("gender", FeatureValue::category("Female")),
        ("age", FeatureValue::category("[60-70)")),
        ("admission_type_id", FeatureValue::Number(1.0)),
        ("discharge_disposition_id", FeatureValue::Number(1.0)),
        ("admission_source_id", FeatureValue::Number(7.0)),
        ("time_in_hospital", FeatureValue::Number(4.0)),
        ("num_lab_procedures", FeatureValue::Number(50.0)),
        ("num_procedures", FeatureValue::Number(2.0)),
        ("num_medications", FeatureValue::Number(14.0)),
        ("number_outpatient", FeatureValue::Number(0.0)),
        ("number_emergency", FeatureValue::Number(1.0)),
        ("number_inpatient", FeatureValue::Number(0.0)),
        ("A1Cresult", FeatureValue::category(">7")),
        ("metformin", FeatureValue::category("Steady")),
        ("insulin", FeatureValue::category("Up")),
        ("change", FeatureValue::category("Ch")),
        ("diabetesMed", FeatureValue::category("Yes")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_covers_every_column() {
        assert_eq!(CATEGORICAL_FEATURES.len() + NUMERIC_FEATURES.len(), FEATURE_COLUMNS.len());
        for column in FEATURE_COLUMNS {
            assert!(
                numeric_feature(column).is_some() || categorical_levels(column).is_some(),
                "{} has no schema entry",
                column
            );
        }
    }

    #[test]
    fn test_baseline_follows_column_order() {
        let baseline = surface_baseline();
        let names: Vec<&str> = baseline.names().collect();
        assert_eq!(names, FEATURE_COLUMNS.to_vec());
    }
}
