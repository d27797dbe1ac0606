//! Prediction Service - long-lived state shared by every request
//!
//! Built once at startup. Artifacts load on first use; the surface cache is
//! the only state that changes afterwards.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::logic::explain::{ExplainInput, ExplainMethod, ExplanationEngine, FeatureContribution, PermutationAttributor};
use crate::logic::features::{surface_baseline, FeatureRow};
use crate::logic::model::{ArtifactCache, ArtifactError, ArtifactPaths, Classifier, ModelError, RiskTier, TierThresholds};
use crate::logic::surface::{Surface, SurfaceCache, SweepError, SweepSpec};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Sweep(#[from] SweepError),
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub thresholds: TierThresholds,
    pub caution: String,
    pub max_steps: usize,
    pub surface_cache_size: usize,
    pub attributor: PermutationAttributor,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            thresholds: TierThresholds::default(),
            caution: "This prediction is for research support only and may be biased; \
                      it must not be used for clinical decisions."
                .to_string(),
            max_steps: 50,
            surface_cache_size: 8,
            attributor: PermutationAttributor::default(),
        }
    }
}

/// Explained prediction for one feature row
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub probability: f64,
    pub risk_tier: RiskTier,
    pub top_features: Vec<FeatureContribution>,
    pub explanation_method: ExplainMethod,
    pub caution: String,
}

pub struct PredictionService {
    artifacts: ArtifactCache,
    engine: ExplanationEngine,
    thresholds: TierThresholds,
    surfaces: SurfaceCache,
    max_steps: usize,
    caution: String,
}

impl PredictionService {
    pub fn new(paths: ArtifactPaths, settings: ServiceSettings) -> Self {
        Self {
            artifacts: ArtifactCache::new(paths),
            engine: ExplanationEngine::with_attributor(settings.attributor),
            thresholds: settings.thresholds,
            surfaces: SurfaceCache::new(settings.surface_cache_size, surface_baseline()),
            max_steps: settings.max_steps,
            caution: settings.caution,
        }
    }

    pub fn artifacts(&self) -> &ArtifactCache {
        &self.artifacts
    }

    pub fn surfaces(&self) -> &SurfaceCache {
        &self.surfaces
    }

    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    /// Probability, tier, top contributions and the caution notice
    pub fn predict(&self, row: &FeatureRow) -> Result<Prediction, ServiceError> {
        let model = self.artifacts.model()?;
        let base_model = self.artifacts.base_model();
        let reference = self.artifacts.reference();
        let background = self.artifacts.background();

        let probability = model.predict_proba(row)?;

        let explanation = self.engine.explain(&ExplainInput {
            model: &*model,
            base_model: base_model.as_deref().map(|m| m as &dyn Classifier),
            row,
            reference: &reference,
            background: &background,
        })?;

        Ok(Prediction {
            probability,
            risk_tier: self.thresholds.tier(probability),
            top_features: explanation.contributions,
            explanation_method: explanation.method,
            caution: self.caution.clone(),
        })
    }

    /// Probability and tier only, for bulk scoring
    pub fn score(&self, row: &FeatureRow) -> Result<(f64, RiskTier), ServiceError> {
        let model = self.artifacts.model()?;
        let probability = model.predict_proba(row)?;
        Ok((probability, self.thresholds.tier(probability)))
    }

    /// Validates the sweep before touching the model
    pub fn surface(&self, feature_x: &str, feature_y: &str, steps: i64) -> Result<Arc<Surface>, ServiceError> {
        let spec = SweepSpec::validate(feature_x, feature_y, steps, self.max_steps)?;
        let model = self.artifacts.model()?;
        let version = self.artifacts.model_version();
        Ok(self.surfaces.get_or_compute(&*model, &spec, version)?)
    }
}
