//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;
use crate::triage_service::ServiceHealth;

#[derive(Serialize)]
pub struct HealthResponse {
    #[serde(flatten)]
    pub health: ServiceHealth,
    pub uptime_secs: u64,
}

/// `GET /api/health`: collaborator availability and model names.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        health: ctx.service.health(),
        uptime_secs: ctx.started_at.elapsed().as_secs(),
    })
}
