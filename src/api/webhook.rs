//! Webhook handler for Gitee push events

use axum::{
    Json,
    body::Bytes,
    extract::State as AxumState,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::SharedState;
use crate::api::deploy_response;
use crate::webhook::{WebhookPayload, evaluate};

/// POST /webhook - Token check runs as middleware before this handler.
///
/// The body is decoded leniently: anything that is not a JSON object with a
/// `hook_name` is handled as a manual trigger.
pub async fn handle_webhook(AxumState(state): AxumState<SharedState>, body: Bytes) -> Response {
    let payload = WebhookPayload::from_body(&body);

    let decision = evaluate(&payload, &state.config.allowed_branches);
    if !decision.proceed {
        return Json(json!({
            "status": "skipped",
            "reason": decision.reason,
        }))
        .into_response();
    }

    deploy_response(state.deployer.trigger().await)
}
