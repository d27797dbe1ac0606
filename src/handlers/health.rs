//! Health check handlers

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{AppState, AppResult};
use crate::logic::surface::CacheStats;
use crate::models::ModelMetadata;
use super::reports::load_json;

#[derive(Serialize)]
pub struct LivenessResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model_loaded: bool,
    model_version: Option<String>,
    model_checksum: String,
    loaded_at: DateTime<Utc>,
    surface_cache: CacheStats,
    timestamp: i64,
}

pub async fn root() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "ok" })
}

/// Readiness: the primary model must load
pub async fn check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let service = state.service.clone();
    let model = tokio::task::spawn_blocking(move || service.artifacts().model()).await??;

    let model_version = load_json::<ModelMetadata>(&state.config.metadata_path)
        .await
        .ok()
        .map(|metadata| metadata.model_version);

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model_loaded: true,
        model_version,
        model_checksum: model.checksum.clone(),
        loaded_at: model.loaded_at,
        surface_cache: state.service.surfaces().stats(),
        timestamp: Utc::now().timestamp(),
    }))
}
