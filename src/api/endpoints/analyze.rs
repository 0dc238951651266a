//! Symptom triage endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{AnalyzeRequest, ApiContext};
use crate::pipeline::triage::ApiResponse;

/// `POST /api/analyze`: triage one patient.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let input = request.into_input()?;

    let service = ctx.service.clone();
    let response = tokio::task::spawn_blocking(move || service.analyze(&input)).await?;

    Ok(Json(response))
}
