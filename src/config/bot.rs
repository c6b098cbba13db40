//! Bot configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::telegram::DEFAULT_API_BASE_URL;

/// Identity, credentials and dispatch switches of the bot.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot username, with or without the leading `@`
    pub username: String,

    /// Numeric bot id; required for `run_commands`
    #[serde(default)]
    pub id: Option<i64>,

    /// Bot API token
    pub token: SecretString,

    /// Admin user ids (comma-separated)
    #[serde(default)]
    pub admins: Option<String>,

    /// Public URL registered with `setWebhook` on startup
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Secret expected in the `X-Telegram-Bot-Api-Secret-Token` header
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,

    /// Bot API endpoint
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Allow `getUpdates` without a database
    #[serde(default)]
    pub getupdates_without_database: bool,
}

impl BotConfig {
    /// Admin ids parsed from the comma list. Blank entries are skipped.
    ///
    /// Only non-numeric entries are errors; zero or negative ids are passed
    /// through for the admin authority to log and drop.
    pub fn admin_ids(&self) -> Result<Vec<i64>, ValidationError> {
        let Some(raw) = self.admins.as_deref() else {
            return Ok(Vec::new());
        };

        raw.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .parse::<i64>()
                    .map_err(|_| ValidationError::InvalidAdminId(entry.to_string()))
            })
            .collect()
    }

    /// Validate bot configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().trim_start_matches('@').is_empty() {
            return Err(ValidationError::MissingRequired("BOT__USERNAME"));
        }
        if self.token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("BOT__TOKEN"));
        }
        if self.id.is_some_and(|id| id <= 0) {
            return Err(ValidationError::InvalidBotId);
        }
        self.admin_ids()?;
        if let Some(secret) = &self.webhook_secret {
            if !is_valid_secret_token(secret.expose_secret()) {
                return Err(ValidationError::InvalidWebhookSecret);
            }
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::InvalidApiBaseUrl);
        }
        Ok(())
    }
}

/// Telegram accepts 1-256 characters from `A-Z a-z 0-9 _ -`.
fn is_valid_secret_token(token: &str) -> bool {
    (1..=256).contains(&token.len())
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
