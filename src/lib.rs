//! Discharge Compass - Readmission Risk Prediction Service
//!
//! Serves explained risk predictions from a pre-trained classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     DISCHARGE COMPASS                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────────────────────────────┐   │
//! │  │  API       │   │  Prediction Service                  │   │
//! │  │  (Axum)    │──▶│  artifacts → explain → risk tier     │   │
//! │  │  + rate    │   │  artifacts → surface cache (LRU)     │   │
//! │  │    limiter │   └──────────────────┬───────────────────┘   │
//! │  └────────────┘                      ▼                       │
//! │                         ┌────────────────────────┐           │
//! │                         │  artifact dir (JSON)   │           │
//! │                         └────────────────────────┘           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
    http::HeaderValue,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

use config::Config;
use logic::{PredictionService, RateLimiter};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub service: Arc<PredictionService>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    /// Build service state from configuration; fails on bad thresholds
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let settings = config.service_settings()?;
        let service = PredictionService::new(config.artifact_paths(), settings);
        let rate_limiter = config
            .rate_limit_enabled
            .then(|| Arc::new(RateLimiter::new(config.rate_limit_per_minute)));

        Ok(Self {
            config: Arc::new(config),
            service: Arc::new(service),
            rate_limiter,
        })
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Public routes (never throttled)
    let public_routes = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check));

    // Expensive or artifact-backed routes, gated by the rate limiter
    let limited_routes = Router::new()
        .route("/predict", post(handlers::predict::predict))
        .route("/predict-batch", post(handlers::predict::predict_batch))
        .route("/risk-surface", get(handlers::surface::risk_surface))
        .route("/model-metadata", get(handlers::reports::model_metadata))
        .route("/fairness-report", get(handlers::reports::fairness_report))
        .route("/metrics", get(handlers::reports::metrics_report))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::enforce_rate_limit,
        ));

    Router::new()
        .merge(public_routes)
        .merge(limited_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
