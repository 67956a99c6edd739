//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use wine_core::{PredictionRequest, PredictionResponse};

use crate::{AppError, AppResult, AppState};

/// Score one wine. Every schema feature must be present as a number;
/// unknown keys are ignored.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let response = state.service.predict(&request)?;
    tracing::debug!(
        "Scored request: probability={:.4} good_quality={}",
        response.probability,
        response.good_quality
    );

    Ok(Json(response))
}
