//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::logic::features::ValidationError;
use crate::logic::model::ArtifactError;
use crate::logic::service::ServiceError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Artifact missing or unreadable (retryable)
    ServiceUnavailable(String),

    // Caller errors
    ValidationError(String),
    InvalidSweep(String),

    // Throttling
    RateLimited,

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg.as_str())
            }
            AppError::ValidationError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::InvalidSweep(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.as_str()),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded"),
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<ArtifactError> for AppError {
    fn from(err: ArtifactError) -> Self {
        AppError::ServiceUnavailable(err.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Artifact(e) => e.into(),
            ServiceError::Sweep(e) => AppError::InvalidSweep(e.to_string()),
            ServiceError::Model(e) => AppError::InternalError(format!("Model failed to score: {}", e)),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("Worker task failed: {}", err))
    }
}
