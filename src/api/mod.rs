//! HTTP routes for the relay
//!
//! `/health` is open, `/webhook` sits behind the Gitee token middleware and
//! `/trigger` checks its own secret.

pub mod health;
pub mod trigger;
pub mod webhook;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::auth::require_webhook_token;
use crate::deploy::DeployResult;
use crate::SharedState;

// Re-export handlers
pub use health::health;
pub use trigger::manual_trigger;
pub use webhook::handle_webhook;

/// Build the relay router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/webhook",
            post(handle_webhook)
                .layer(DefaultBodyLimit::disable())
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_webhook_token,
                )),
        )
        .route("/trigger", get(manual_trigger).post(manual_trigger))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Map a deploy outcome to `200 {status: success}` or `500 {status: error}`.
pub(crate) fn deploy_response(result: DeployResult) -> Response {
    if result.success {
        Json(json!({
            "status": "success",
            "message": result.message,
        }))
        .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": result.message,
            })),
        )
            .into_response()
    }
}
