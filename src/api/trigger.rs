//! Manual deploy trigger endpoint

use axum::{
    Json,
    extract::{Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::SharedState;
use crate::api::deploy_response;
use crate::auth::verify_token;

pub const SECRET_HEADER: &str = "X-Secret";

/// GET|POST /trigger - Redeploy without going through the event filter.
/// The secret comes from `?secret=` or, failing that, the `X-Secret` header.
pub async fn manual_trigger(
    AxumState(state): AxumState<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let secret = params
        .get("secret")
        .map(String::as_bytes)
        .filter(|s| !s.is_empty())
        .or_else(|| headers.get(SECRET_HEADER).map(|v| v.as_bytes()))
        .unwrap_or(b"");

    if !verify_token(state.config.webhook_secret.as_bytes(), secret) {
        warn!("Rejected manual trigger with invalid secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid secret" })),
        )
            .into_response();
    }

    info!("Manual deploy trigger requested");
    deploy_response(state.deployer.trigger().await)
}
