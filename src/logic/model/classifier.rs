//! Classifier seam - anything that scores a feature row

use thiserror::Error;

use crate::logic::features::FeatureRow;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("feature {0} expects a numeric value")]
    ExpectedNumber(String),

    #[error("feature {0} expects a categorical value")]
    ExpectedCategory(String),

    #[error("model produced a non-finite probability")]
    NonFinite,
}

/// Trait for fitted binary classifiers (scorecard, test doubles, ...)
pub trait Classifier: Send + Sync {
    /// Probability of the positive class for one row
    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, ModelError>;

    fn predict_proba_batch(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, ModelError> {
        rows.iter().map(|row| self.predict_proba(row)).collect()
    }
}

impl<C: Classifier + ?Sized> Classifier for std::sync::Arc<C> {
    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        (**self).predict_proba(row)
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
