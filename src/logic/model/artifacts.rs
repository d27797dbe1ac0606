//! Artifact Cache - load-once model, reference and background artifacts
//!
//! Each artifact is read from disk on first use and kept for the process
//! lifetime. The primary model is required; everything else is optional and
//! degrades to "absent" when the file is missing or unreadable.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::classifier::{Classifier, ModelError};
use super::scorecard::ScorecardModel;
use crate::logic::features::{FeatureRow, FeatureValue};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model artifact not found at {}", .0.display())]
    Missing(PathBuf),

    #[error("Model artifact at {} could not be loaded: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

// ============================================================================
// ARTIFACT TYPES
// ============================================================================

/// A loaded scorecard plus provenance
#[derive(Debug)]
pub struct ModelArtifact {
    pub model: ScorecardModel,
    pub path: PathBuf,
    /// SHA-256 of the file bytes
    pub checksum: String,
    pub loaded_at: DateTime<Utc>,
}

impl Classifier for ModelArtifact {
    fn predict_proba(&self, row: &FeatureRow) -> Result<f64, ModelError> {
        self.model.predict_proba(row)
    }
}

/// Feature name -> typical value (median / mode from training)
pub type FeatureReference = HashMap<String, FeatureValue>;

/// Real feature rows used as the attribution baseline distribution
#[derive(Debug, Clone, Default)]
pub struct BackgroundSample {
    rows: Vec<HashMap<String, FeatureValue>>,
}

impl BackgroundSample {
    pub fn new(rows: Vec<HashMap<String, FeatureValue>>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Background row `index` laid out in `template`'s feature order.
    /// None if the background row lacks any of the template's features.
    pub fn aligned_row(&self, index: usize, template: &FeatureRow) -> Option<FeatureRow> {
        let source = self.rows.get(index)?;
        let mut row = FeatureRow::new();
        for name in template.names() {
            row.set(name, source.get(name)?.clone());
        }
        Some(row)
    }
}

/// Opaque token derived from the model file's modification time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ModelVersion(pub u128);

/// File locations for every artifact
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub base_model: PathBuf,
    pub reference: PathBuf,
    pub background: PathBuf,
}

impl ArtifactPaths {
    /// Default file names inside one artifact directory
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join("model.json"),
            base_model: dir.join("base_model.json"),
            reference: dir.join("feature_reference.json"),
            background: dir.join("background_sample.json"),
        }
    }
}

// ============================================================================
// CACHE
// ============================================================================

pub struct ArtifactCache {
    paths: ArtifactPaths,
    model: OnceCell<Arc<ModelArtifact>>,
    base_model: OnceCell<Option<Arc<ModelArtifact>>>,
    reference: OnceCell<Arc<FeatureReference>>,
    background: OnceCell<Arc<BackgroundSample>>,
}

impl ArtifactCache {
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            model: OnceCell::new(),
            base_model: OnceCell::new(),
            reference: OnceCell::new(),
            background: OnceCell::new(),
        }
    }

    /// Primary (calibrated) model. Failures are not memoized, so a model
    /// dropped in later is picked up by the next call.
    pub fn model(&self) -> Result<Arc<ModelArtifact>, ArtifactError> {
        self.model
            .get_or_try_init(|| load_model(&self.paths.model).map(Arc::new))
            .cloned()
    }

    /// Uncalibrated model used for attributions, if shipped
    pub fn base_model(&self) -> Option<Arc<ModelArtifact>> {
        self.base_model
            .get_or_init(|| {
                if !self.paths.base_model.exists() {
                    tracing::debug!("No base model at {}", self.paths.base_model.display());
                    return None;
                }
                match load_model(&self.paths.base_model) {
                    Ok(model) => Some(Arc::new(model)),
                    Err(e) => {
                        tracing::warn!("Ignoring base model: {}", e);
                        None
                    }
                }
            })
            .clone()
    }

    pub fn reference(&self) -> Arc<FeatureReference> {
        self.reference
            .get_or_init(|| Arc::new(load_optional_json(&self.paths.reference).unwrap_or_default()))
            .clone()
    }

    pub fn background(&self) -> Arc<BackgroundSample> {
        self.background
            .get_or_init(|| {
                let rows: Vec<HashMap<String, FeatureValue>> =
                    load_optional_json(&self.paths.background).unwrap_or_default();
                Arc::new(BackgroundSample::new(rows))
            })
            .clone()
    }

    /// Current modification time of the model file; zero when missing
    pub fn model_version(&self) -> ModelVersion {
        fs::metadata(&self.paths.model)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| ModelVersion(d.as_nanos()))
            .unwrap_or_default()
    }
}

fn load_model(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing(path.to_path_buf()));
    }

    tracing::info!("Loading model artifact from: {}", path.display());

    let bytes = fs::read(path).map_err(|e| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let model = ScorecardModel::from_json(&bytes).map_err(|e| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let checksum = format!("{:x}", hasher.finalize());

    tracing::info!(
        "Model loaded ({} numeric, {} categorical terms, calibrated: {})",
        model.numeric.len(),
        model.categorical.len(),
        model.is_calibrated()
    );

    Ok(ModelArtifact {
        model,
        path: path.to_path_buf(),
        checksum,
        loaded_at: Utc::now(),
    })
}

fn load_optional_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        tracing::debug!("Optional artifact absent: {}", path.display());
        return None;
    }
    let parsed = fs::read(path)
        .map_err(|e| e.to_string())
        .and_then(|bytes| serde_json::from_slice(&bytes).map_err(|e| e.to_string()));
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring unreadable artifact {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    const MODEL_JSON: &str = r#"{"intercept": 0.0, "numeric": [], "categorical": []}"#;

    fn cache_in(dir: &Path) -> ArtifactCache {
        ArtifactCache::new(ArtifactPaths::in_dir(dir))
    }

    #[test]
    fn test_missing_model_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());

        assert!(matches!(cache.model(), Err(ArtifactError::Missing(_))));

        fs::write(dir.path().join("model.json"), MODEL_JSON).unwrap();
        assert!(cache.model().is_ok());
    }

    #[test]
    fn test_model_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model.json"), MODEL_JSON).unwrap();
        let cache = cache_in(dir.path());

        let first = cache.model().unwrap();
        fs::remove_file(dir.path().join("model.json")).unwrap();
        let second = cache.model().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.checksum.len(), 64);
    }

    #[test]
    fn test_malformed_model_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model.json"), "not json").unwrap();
        let cache = cache_in(dir.path());
        assert!(matches!(cache.model(), Err(ArtifactError::Invalid { .. })));
    }

    #[test]
    fn test_optional_artifacts_degrade() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());

        assert!(cache.base_model().is_none());
        assert!(cache.reference().is_empty());
        assert!(cache.background().is_empty());
    }

    #[test]
    fn test_reference_and_background_parse() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("feature_reference.json"),
            r#"{"race": "Caucasian", "time_in_hospital": 4}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("background_sample.json"),
            r#"[{"race": "Asian", "time_in_hospital": 3}, {"race": "Other"}]"#,
        )
        .unwrap();
        let cache = cache_in(dir.path());

        let reference = cache.reference();
        assert_eq!(reference.get("time_in_hospital"), Some(&FeatureValue::Number(4.0)));
        assert!(Arc::ptr_eq(&reference, &cache.reference()));

        let background = cache.background();
        assert_eq!(background.len(), 2);

        let template = FeatureRow::from_pairs([
            ("time_in_hospital", FeatureValue::Number(9.0)),
            ("race", FeatureValue::category("Hispanic")),
        ]);
        let aligned = background.aligned_row(0, &template).unwrap();
        assert_eq!(aligned.names().collect::<Vec<_>>(), vec!["time_in_hospital", "race"]);
        assert_eq!(aligned.get("race"), Some(&FeatureValue::category("Asian")));
        assert!(background.aligned_row(1, &template).is_none());
    }

    #[test]
    fn test_model_version_tracks_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_in(dir.path());
        assert_eq!(cache.model_version(), ModelVersion(0));

        let path = dir.path().join("model.json");
        fs::write(&path, MODEL_JSON).unwrap();
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(3600)).unwrap();
        let before = cache.model_version();

        file.set_modified(SystemTime::now()).unwrap();
        let after = cache.model_version();

        assert_ne!(before, ModelVersion(0));
        assert_ne!(before, after);
    }
}
