//! Test doubles shared by the logic unit tests

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::logic::features::FeatureRow;
use crate::logic::model::{Classifier, ModelError};

/// p = 0.5 + sum(weight * value) over numeric features, unclamped
pub struct LinearModel {
    weights: Vec<(String, f64)>,
}

impl LinearModel {
    pub fn new(weights: &[(&str, f64)]) -> Self {
        Self {
            weights: weights.iter().map(|(n, w)| (n.to_string(), *w)).collect(),
        }
    }
}

impl Classifier for LinearModel {
    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        let mut p = 0.5;
        for (name, weight) in &self.weights {
            let x = row.get(name).and_then(|v| v.as_number()).unwrap_or(0.0);
            p += weight * x;
        }
        Ok(p)
    }
}

/// Counts every scoring call
pub struct CountingModel<C> {
    inner: C,
    calls: AtomicUsize,
}

impl<C: Classifier> CountingModel<C> {
    pub fn new(inner: C) -> Self {
        Self { inner, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<C: Classifier> Classifier for CountingModel<C> {
    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.predict_proba(row)
    }
}

/// Always fails to score
pub struct BrokenModel;

impl Classifier for BrokenModel {
    fn predict_proba(&self, _row: &FeatureRow) -> Result<f64, ModelError> {
        Err(ModelError::NonFinite)
    }
}
