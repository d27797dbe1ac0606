//! Risk surface handler

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::{AppError, AppState, AppResult};
use crate::logic::surface::Surface;
use crate::models::SurfaceQuery;

/// Probability grid over two numeric features
pub async fn risk_surface(
    State(state): State<AppState>,
    query: Result<Query<SurfaceQuery>, QueryRejection>,
) -> AppResult<Json<Arc<Surface>>> {
    let Query(query) = query.map_err(|e| AppError::InvalidSweep(e.body_text()))?;

    let service = state.service.clone();
    let surface = tokio::task::spawn_blocking(move || {
        service.surface(&query.feature_x, &query.feature_y, query.steps)
    })
    .await??;

    Ok(Json(surface))
}
