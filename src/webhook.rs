//! Gitee webhook payloads and the push-event filter

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::info;

use crate::utils::truncate_chars;

pub const PUSH_HOOK_NAME: &str = "push_hooks";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Commit {
    pub id: String,
    pub message: String,
}

/// The fields of an inbound webhook body the relay cares about.
/// Anything missing or of the wrong type is left empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookPayload {
    pub hook_name: String,
    pub git_ref: String,
    pub commits: Vec<Commit>,
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

impl WebhookPayload {
    /// Decode a request body without ever failing. Malformed or empty
    /// bodies produce an empty payload, which the filter treats as a
    /// manual trigger.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_value(&value),
            Err(_) => Self::default(),
        }
    }

    pub fn from_value(payload: &Value) -> Self {
        let commits = payload
            .get("commits")
            .and_then(|c| c.as_array())
            .map(|list| {
                list.iter()
                    .map(|c| Commit {
                        id: str_field(c, "id"),
                        message: str_field(c, "message"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            hook_name: str_field(payload, "hook_name"),
            git_ref: str_field(payload, "ref"),
            commits,
        }
    }

    pub fn latest_commit(&self) -> Option<&Commit> {
        self.commits.last()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterDecision {
    pub proceed: bool,
    pub reason: String,
}

impl FilterDecision {
    fn proceed() -> Self {
        Self {
            proceed: true,
            reason: String::new(),
        }
    }

    fn skip(reason: impl Into<String>) -> Self {
        Self {
            proceed: false,
            reason: reason.into(),
        }
    }
}

/// Decide whether a payload should trigger a deploy.
///
/// Payloads carrying a `hook_name` must be a push to an allowed branch.
/// Payloads without one are manual triggers and always proceed.
pub fn evaluate(payload: &WebhookPayload, allowed_branches: &BTreeSet<String>) -> FilterDecision {
    if payload.hook_name.is_empty() {
        info!("Manual trigger received");
        return FilterDecision::proceed();
    }

    info!(
        "Received Gitee webhook: hook_name={}, ref={}",
        payload.hook_name, payload.git_ref
    );

    if payload.hook_name != PUSH_HOOK_NAME {
        info!("Skipping non-push event: {}", payload.hook_name);
        return FilterDecision::skip("not a push event");
    }

    if !allowed_branches.contains(&payload.git_ref) {
        info!("Skipping branch not in allowed list: {}", payload.git_ref);
        return FilterDecision::skip(format!("branch {} not allowed", payload.git_ref));
    }

    if let Some(commit) = payload.latest_commit() {
        info!(
            "Latest commit: {} - {}",
            truncate_chars(&commit.id, 8),
            truncate_chars(&commit.message, 50)
        );
    }

    FilterDecision::proceed()
}
