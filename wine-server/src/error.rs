//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use wine_core::{MissingFeaturesError, PredictError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Request body is valid JSON but lacks schema features
    #[error(transparent)]
    MissingFeatures(#[from] MissingFeaturesError),

    /// Complete request whose values the model cannot score
    #[error("{0}")]
    Unscorable(String),

    /// Body could not be read as a JSON object
    #[error("{0}")]
    BadRequest(String),
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::MissingFeatures(missing) => AppError::MissingFeatures(missing),
            other @ PredictError::NonFiniteScore { .. } => AppError::Unscorable(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MissingFeatures(err) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                tracing::debug!("Rejected request, missing {:?}", err.missing);
                (
                    status,
                    json!({
                        "error": "MissingFeatures",
                        "message": err.to_string(),
                        "missing": err.missing,
                        "expected": err.expected,
                        "status": status.as_u16()
                    }),
                )
            }
            AppError::Unscorable(msg) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                tracing::warn!("Rejected unscorable request: {}", msg);
                (
                    status,
                    json!({
                        "error": "NonFiniteScore",
                        "message": msg,
                        "status": status.as_u16()
                    }),
                )
            }
            AppError::BadRequest(msg) => {
                let status = StatusCode::BAD_REQUEST;
                (
                    status,
                    json!({
                        "error": "BadRequest",
                        "message": msg,
                        "status": status.as_u16()
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
