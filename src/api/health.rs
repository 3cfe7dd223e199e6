//! Health check endpoint

use axum::{Json, extract::State as AxumState};
use serde::Serialize;

use crate::SharedState;
use crate::utils::truncate_chars;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service_id: String,
    pub token_configured: bool,
}

/// GET /health - Always 200; reports whether an API token is configured
pub async fn health(AxumState(state): AxumState<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service_id: format!("{}...", truncate_chars(&state.config.service_id, 8)),
        token_configured: state.config.token_configured(),
    })
}
