//! Inference gateway route.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{GenerationRequest, GenerationResponse};

/// `POST /api/inference`: always answers; backend failures yield demo text.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(state.gateway.generate(&request).await))
}

#[cfg(test)]
#[path = "inference_test.rs"]
mod tests;
