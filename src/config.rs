//! Configuration module

use std::env;
use std::path::PathBuf;

use crate::logic::explain::PermutationAttributor;
use crate::logic::model::{ArtifactPaths, ThresholdError, TierThresholds};
use crate::logic::service::ServiceSettings;

const DEFAULT_CAUTION: &str =
    "This prediction is for research support only and may be biased; it must not be used for clinical decisions.";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding every artifact unless overridden
    pub artifact_dir: PathBuf,

    pub model_path: PathBuf,
    pub base_model_path: PathBuf,
    pub reference_path: PathBuf,
    pub background_path: PathBuf,

    /// Precomputed reports served as-is
    pub metadata_path: PathBuf,
    pub fairness_path: PathBuf,
    pub metrics_path: PathBuf,

    /// Risk tier cut points
    pub low_risk_threshold: f64,
    pub high_risk_threshold: f64,

    pub caution_message: String,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,

    pub rate_limit_enabled: bool,
    pub rate_limit_per_minute: u32,

    pub risk_surface_max_steps: usize,
    pub risk_surface_cache_size: usize,

    /// Orderings sampled per attribution
    pub attribution_permutations: usize,

    /// Background rows used per attribution
    pub attribution_max_background: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let artifact_dir = PathBuf::from(env::var("ARTIFACT_DIR").unwrap_or_else(|_| "artifacts".to_string()));
        let artifact_path = |key: &str, file: &str| {
            env::var(key)
                .map(PathBuf::from)
                .unwrap_or_else(|_| artifact_dir.join(file))
        };

        Self {
            port: parse_var("PORT", 8000),

            model_path: artifact_path("MODEL_PATH", "model.json"),
            base_model_path: artifact_path("BASE_MODEL_PATH", "base_model.json"),
            reference_path: artifact_path("REFERENCE_PATH", "feature_reference.json"),
            background_path: artifact_path("BACKGROUND_PATH", "background_sample.json"),
            metadata_path: artifact_path("METADATA_PATH", "model_metadata.json"),
            fairness_path: artifact_path("FAIRNESS_PATH", "fairness_report.json"),
            metrics_path: artifact_path("METRICS_PATH", "eval_metrics.json"),

            low_risk_threshold: parse_var("LOW_RISK_THRESHOLD", 0.2),
            high_risk_threshold: parse_var("HIGH_RISK_THRESHOLD", 0.5),

            caution_message: env::var("CAUTION_MESSAGE").unwrap_or_else(|_| DEFAULT_CAUTION.to_string()),

            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:3001".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),

            rate_limit_enabled: env::var("RATE_LIMIT_ENABLED")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            rate_limit_per_minute: parse_var("RATE_LIMIT_PER_MINUTE", 120),

            risk_surface_max_steps: parse_var("RISK_SURFACE_MAX_STEPS", 50),
            risk_surface_cache_size: parse_var("RISK_SURFACE_CACHE_SIZE", 8),

            attribution_permutations: parse_var("ATTRIBUTION_PERMUTATIONS", 8),
            attribution_max_background: parse_var("ATTRIBUTION_MAX_BACKGROUND", 50),

            artifact_dir,
        }
    }

    /// Configuration rooted at one artifact directory, everything else default
    pub fn for_artifact_dir(dir: impl Into<PathBuf>) -> Self {
        let artifact_dir = dir.into();
        let paths = ArtifactPaths::in_dir(&artifact_dir);
        Self {
            port: 8000,
            model_path: paths.model,
            base_model_path: paths.base_model,
            reference_path: paths.reference,
            background_path: paths.background,
            metadata_path: artifact_dir.join("model_metadata.json"),
            fairness_path: artifact_dir.join("fairness_report.json"),
            metrics_path: artifact_dir.join("eval_metrics.json"),
            low_risk_threshold: 0.2,
            high_risk_threshold: 0.5,
            caution_message: DEFAULT_CAUTION.to_string(),
            cors_origins: Vec::new(),
            rate_limit_enabled: false,
            rate_limit_per_minute: 120,
            risk_surface_max_steps: 50,
            risk_surface_cache_size: 8,
            attribution_permutations: 8,
            attribution_max_background: 50,
            artifact_dir,
        }
    }

    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            model: self.model_path.clone(),
            base_model: self.base_model_path.clone(),
            reference: self.reference_path.clone(),
            background: self.background_path.clone(),
        }
    }

    /// Settings for the prediction service; fails on misordered thresholds
    pub fn service_settings(&self) -> Result<ServiceSettings, ThresholdError> {
        Ok(ServiceSettings {
            thresholds: TierThresholds::new(self.low_risk_threshold, self.high_risk_threshold)?,
            caution: self.caution_message.clone(),
            max_steps: self.risk_surface_max_steps,
            surface_cache_size: self.risk_surface_cache_size,
            attributor: PermutationAttributor {
                permutations: self.attribution_permutations,
                max_background: self.attribution_max_background,
                ..Default::default()
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
