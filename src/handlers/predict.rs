//! Prediction handlers

use axum::{extract::State, Json};
use validator::Validate;

use crate::{AppError, AppState, AppResult};
use crate::logic::features::{validate_features, FeatureRow};
use crate::logic::Prediction;
use crate::models::{BatchPredictRequest, BatchPredictResponse, PredictRequest};

/// Feature row checked against the schema (enumerations and numeric ranges)
fn validated_row(req: &PredictRequest) -> Result<FeatureRow, AppError> {
    let row = req.to_row();
    validate_features(&row)?;
    Ok(row)
}

/// Explained prediction for one encounter
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<Prediction>> {
    let row = validated_row(&req)?;

    let service = state.service.clone();
    let prediction = tokio::task::spawn_blocking(move || service.predict(&row)).await??;

    tracing::debug!(
        "Predicted {:.4} ({}) via {:?}",
        prediction.probability,
        prediction.risk_tier.as_str(),
        prediction.explanation_method
    );

    Ok(Json(prediction))
}

/// Score many encounters without explanations
pub async fn predict_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchPredictRequest>,
) -> AppResult<Json<BatchPredictResponse>> {
    req.validate()?;

    let rows = req
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            validated_row(r).map_err(|e| match e {
                AppError::ValidationError(msg) => AppError::ValidationError(format!("row {}: {}", i + 1, msg)),
                other => other,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let service = state.service.clone();
    let scores = tokio::task::spawn_blocking(move || {
        rows.iter().map(|row| service.score(row)).collect::<Result<Vec<_>, _>>()
    })
    .await??;

    tracing::info!("Scored batch of {} rows", scores.len());

    Ok(Json(BatchPredictResponse::from_scores(&scores)))
}
