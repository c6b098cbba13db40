//! Configuration errors

use thiserror::Error;

/// Failure to build an [`AppConfig`](super::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("configuration is invalid: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value that is out of range or malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequired(&'static str),

    #[error("server port must be non-zero")]
    InvalidPort,

    #[error("cannot bind to '{0}'")]
    InvalidBindAddress(String),

    #[error("request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("webhook path must start with '/'")]
    InvalidWebhookPath,

    #[error("admin id '{0}' is not an integer")]
    InvalidAdminId(String),

    #[error("bot id must be positive")]
    InvalidBotId,

    #[error("webhook secret must be 1-256 characters of A-Z, a-z, 0-9, '_' or '-'")]
    InvalidWebhookSecret,

    #[error("Bot API base URL must be http(s)")]
    InvalidApiBaseUrl,

    #[error("polling limit must be between 1 and 100")]
    InvalidPollingLimit,

    #[error("polling interval must be non-zero")]
    InvalidPollingInterval,

    #[error("database URL must use the postgres:// or postgresql:// scheme")]
    InvalidDatabaseUrl,

    #[error("database min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("database max_connections exceeds 100")]
    PoolSizeTooLarge,
}
