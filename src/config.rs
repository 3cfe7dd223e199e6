//! Relay configuration, read once from the process environment.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::ConfigError;

pub const DEFAULT_SERVICE_ID: &str = "4a60c1dd-be4b-4624-aecc-7c736a09b8ec";
pub const DEFAULT_ENVIRONMENT_ID: &str = "a7f4ef40-9acc-4aef-8821-ca5092bbaf03";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_ALLOWED_BRANCHES: [&str; 2] = ["refs/heads/main", "refs/heads/master"];

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_token: String,
    pub service_id: String,
    pub environment_id: String,
    pub webhook_secret: String,
    pub port: u16,
    pub allowed_branches: BTreeSet<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            service_id: DEFAULT_SERVICE_ID.to_string(),
            environment_id: DEFAULT_ENVIRONMENT_ID.to_string(),
            webhook_secret: String::new(),
            port: DEFAULT_PORT,
            allowed_branches: DEFAULT_ALLOWED_BRANCHES
                .iter()
                .map(|b| b.to_string())
                .collect(),
            log_dir: None,
        }
    }
}

impl RelayConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    /// Unset keys fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };

        let allowed_branches = match lookup("ALLOWED_BRANCHES") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(String::from)
                .collect(),
            None => defaults.allowed_branches,
        };

        Ok(Self {
            api_token: lookup("RAILWAY_API_TOKEN").unwrap_or_default(),
            service_id: lookup("RAILWAY_SERVICE_ID").unwrap_or(defaults.service_id),
            environment_id: lookup("RAILWAY_ENVIRONMENT_ID").unwrap_or(defaults.environment_id),
            webhook_secret: lookup("WEBHOOK_SECRET").unwrap_or_default(),
            port,
            allowed_branches,
            log_dir: lookup("LOG_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn token_configured(&self) -> bool {
        !self.api_token.is_empty()
    }

    pub fn secret_configured(&self) -> bool {
        !self.webhook_secret.is_empty()
    }

    /// Log what is configured. Secrets are reported as booleans only.
    pub fn log_summary(&self) {
        if !self.token_configured() {
            warn!("RAILWAY_API_TOKEN not set! Deploy triggers will fail until it is configured.");
        }
        info!("Starting deploy relay on port {}", self.port);
        info!("Service ID: {}", self.service_id);
        info!("Environment ID: {}", self.environment_id);
        info!("Allowed branches: {:?}", self.allowed_branches);
        info!("Webhook secret configured: {}", self.secret_configured());
        info!("API token configured: {}", self.token_configured());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<RelayConfig, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.service_id, DEFAULT_SERVICE_ID);
        assert_eq!(config.environment_id, DEFAULT_ENVIRONMENT_ID);
        assert_eq!(config.port, 9000);
        assert!(!config.token_configured());
        assert!(!config.secret_configured());
        assert!(config.allowed_branches.contains("refs/heads/main"));
        assert!(config.allowed_branches.contains("refs/heads/master"));
        assert_eq!(config.allowed_branches.len(), 2);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn reads_all_values() {
        let config = load(&[
            ("RAILWAY_API_TOKEN", "tok"),
            ("RAILWAY_SERVICE_ID", "svc"),
            ("RAILWAY_ENVIRONMENT_ID", "env"),
            ("WEBHOOK_SECRET", "s3cret"),
            ("PORT", "8080"),
            ("LOG_DIR", "/var/log/relay"),
        ])
        .unwrap();
        assert_eq!(config.api_token, "tok");
        assert_eq!(config.service_id, "svc");
        assert_eq!(config.environment_id, "env");
        assert_eq!(config.webhook_secret, "s3cret");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/relay")));
        assert!(config.token_configured());
        assert!(config.secret_configured());
    }

    #[test]
    fn allowed_branches_are_comma_separated() {
        let config = load(&[("ALLOWED_BRANCHES", " refs/heads/release , ,refs/heads/dev")]).unwrap();
        let expected: BTreeSet<String> = ["refs/heads/release", "refs/heads/dev"]
            .iter()
            .map(|b| b.to_string())
            .collect();
        assert_eq!(config.allowed_branches, expected);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = load(&[("PORT", "ninety")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("ninety"));
    }
}
