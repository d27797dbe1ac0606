//! Report handlers - precomputed JSON served as-is

use std::path::Path;

use axum::{extract::State, Json};
use serde::de::DeserializeOwned;

use crate::{AppError, AppState, AppResult};
use crate::models::{ModelMetadata, Report};

/// Read a report artifact; missing files mean the service is not ready
pub(crate) async fn load_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::ServiceUnavailable(format!("Artifact not found at {}", path.display())));
        }
        Err(e) => return Err(AppError::InternalError(format!("{}: {}", path.display(), e))),
    };

    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::InternalError(format!("Malformed artifact {}: {}", path.display(), e)))
}

pub async fn model_metadata(State(state): State<AppState>) -> AppResult<Json<ModelMetadata>> {
    Ok(Json(load_json(&state.config.metadata_path).await?))
}

pub async fn fairness_report(State(state): State<AppState>) -> AppResult<Json<Report>> {
    Ok(Json(load_json(&state.config.fairness_path).await?))
}

pub async fn metrics_report(State(state): State<AppState>) -> AppResult<Json<Report>> {
    Ok(Json(load_json(&state.config.metrics_path).await?))
}
