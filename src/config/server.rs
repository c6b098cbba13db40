//! HTTP listener, logging and run-mode settings

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

/// Listener and process settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Route the webhook endpoint is mounted on
    pub webhook_path: String,
    pub mode: RunMode,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_level: String,
    pub log_format: LogFormat,
    /// Per-request deadline of the webhook endpoint, in seconds (1-300)
    pub request_timeout_secs: u64,
}

/// How updates reach the dispatcher.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Serve the webhook endpoint (push).
    #[default]
    Webhook,
    /// Call `getUpdates` in a loop (pull).
    Polling,
}

/// Log line format.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            webhook_path: "/webhook".to_string(),
            mode: RunMode::Webhook,
            log_level: "info,telegram_dispatch=debug,sqlx=warn".to_string(),
            log_format: LogFormat::Pretty,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidBindAddress(raw))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        if !self.webhook_path.starts_with('/') {
            return Err(ValidationError::InvalidWebhookPath);
        }
        Ok(())
    }
}
