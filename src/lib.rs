pub mod api;
pub mod auth;
pub mod config;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod utils;
pub mod webhook;

use std::sync::Arc;

pub use config::RelayConfig;
pub use deploy::{DeployClient, DeployResult};

/// Read-only state shared by every request handler.
pub struct AppState {
    pub config: RelayConfig,
    pub deployer: DeployClient,
}

impl AppState {
    pub fn new(config: RelayConfig, deployer: DeployClient) -> Self {
        Self { config, deployer }
    }
}

pub type SharedState = Arc<AppState>;
