//! Shared-secret check for inbound Gitee webhooks.

use axum::{
    Json,
    extract::{Request, State as AxumState},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::SharedState;
use crate::utils::truncate_chars;

pub const WEBHOOK_TOKEN_HEADER: &str = "X-Gitee-Token";

/// Returns true when no secret is configured, or the token matches it
/// byte for byte. Header bytes are compared raw so non-ASCII secrets work.
pub fn verify_token(secret: &[u8], token: &[u8]) -> bool {
    secret.is_empty() || bool::from(token.ct_eq(secret))
}

/// Middleware guarding `/webhook`: rejects requests whose `X-Gitee-Token`
/// does not match the configured secret.
pub async fn require_webhook_token(
    AxumState(state): AxumState<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(WEBHOOK_TOKEN_HEADER)
        .map(|v| v.as_bytes())
        .unwrap_or(b"");

    if !verify_token(state.config.webhook_secret.as_bytes(), token) {
        let token = String::from_utf8_lossy(token);
        warn!("Invalid webhook token: {}...", truncate_chars(&token, 10));
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid token" })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppState, DeployClient, RelayConfig};
    use axum::body::Body;
    use axum::http::{HeaderValue, Request};
    use axum::{Router, middleware, routing::post};
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[test]
    fn empty_secret_accepts_anything() {
        assert!(verify_token(b"", b""));
        assert!(verify_token(b"", b"whatever"));
    }

    #[test]
    fn configured_secret_requires_exact_match() {
        assert!(verify_token(b"s3cret", b"s3cret"));
        assert!(!verify_token(b"s3cret", b""));
        assert!(!verify_token(b"s3cret", b"S3CRET"));
        assert!(!verify_token(b"s3cret", b"s3cret "));
        assert!(!verify_token(b"s3cret", b"s3cre"));
    }

    #[test]
    fn utf8_secret_matches_its_bytes() {
        let secret = "密钥".as_bytes();
        assert!(verify_token(secret, "密钥".as_bytes()));
        assert!(!verify_token(secret, "密".as_bytes()));
    }

    /// Collects formatted log output so assertions can inspect it.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn guarded_app(secret: &str) -> Router {
        let config = RelayConfig {
            webhook_secret: secret.to_string(),
            ..RelayConfig::default()
        };
        let deployer = DeployClient::new(&config).unwrap();
        let state = Arc::new(AppState::new(config, deployer));
        Router::new()
            .route(
                "/webhook",
                post(|| async { "passed" }).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_webhook_token,
                )),
            )
            .with_state(state)
    }

    #[tokio::test]
    async fn test_rejected_token_is_logged_truncated() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let response = guarded_app("s3cret")
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header(WEBHOOK_TOKEN_HEADER, "0123456789ABCDEFGHIJ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let output = logs.contents();
        assert!(output.contains("Invalid webhook token: 0123456789..."));
        assert!(!output.contains("ABCDEFGHIJ"));
    }

    #[tokio::test]
    async fn test_utf8_token_header_passes() {
        let response = guarded_app("密钥")
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header(
                        WEBHOOK_TOKEN_HEADER,
                        HeaderValue::from_bytes("密钥".as_bytes()).unwrap(),
                    )
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
