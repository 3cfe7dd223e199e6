/// Errors raised while loading the relay configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid PORT value '{value}': {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },
}

/// Reasons a single deploy trigger call did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("API token not configured")]
    TokenNotConfigured,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// The platform answered with a GraphQL `errors` array.
    #[error("{0}")]
    Upstream(String),
}

/// Helper type for deploy call results
pub type Result<T> = std::result::Result<T, DeployError>;
