//! Railway redeploy trigger

use std::time::Duration;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::RelayConfig;
use crate::error::{DeployError, Result};

pub const RAILWAY_GRAPHQL_ENDPOINT: &str = "https://backboard.railway.com/graphql/v2";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one deploy trigger, returned as-is to HTTP callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployResult {
    pub success: bool,
    pub message: String,
}

impl DeployResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: "Deployment triggered".to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Client for the deployment platform's GraphQL API.
/// One instance is built at startup and shared by all requests.
#[derive(Debug, Clone)]
pub struct DeployClient {
    http: reqwest::Client,
    endpoint: String,
    api_token: String,
    service_id: String,
    environment_id: String,
}

impl DeployClient {
    pub fn new(config: &RelayConfig) -> std::result::Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            endpoint: RAILWAY_GRAPHQL_ENDPOINT.to_string(),
            api_token: config.api_token.clone(),
            service_id: config.service_id.clone(),
            environment_id: config.environment_id.clone(),
        })
    }

    /// Point the client at a different GraphQL endpoint (used by tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn redeploy_mutation(&self) -> String {
        format!(
            r#"mutation {{
    serviceInstanceRedeploy(
        serviceId: "{}",
        environmentId: "{}"
    )
}}"#,
            self.service_id, self.environment_id
        )
    }

    /// Ask the platform to redeploy the configured service. Makes at most
    /// one request and never retries.
    pub async fn trigger(&self) -> DeployResult {
        let span = info_span!("deploy_trigger", trigger_id = %Uuid::now_v7());

        async {
            match self.try_trigger().await {
                Ok(()) => {
                    info!("Deployment triggered successfully");
                    DeployResult::ok()
                }
                Err(e) => {
                    error!("Deployment trigger failed: {}", e);
                    DeployResult::failed(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn try_trigger(&self) -> Result<()> {
        if self.api_token.is_empty() {
            error!("RAILWAY_API_TOKEN not configured");
            return Err(DeployError::TokenNotConfigured);
        }

        info!(
            "Requesting redeploy of service {} in environment {}",
            self.service_id, self.environment_id
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&json!({ "query": self.redeploy_mutation() }))
            .send()
            .await?;

        let raw = response.bytes().await?;
        let data: Value = serde_json::from_slice(&raw)?;
        info!("Railway API response: {}", data);

        if let Some(errors) = data.get("errors").filter(|e| !e.is_null()) {
            let message = errors
                .get(0)
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            error!("Railway API error: {}", message);
            return Err(DeployError::Upstream(message.to_string()));
        }

        Ok(())
    }
}
