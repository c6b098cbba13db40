//! Layered configuration: `.env` file, then `TELEGRAM_DISPATCH__*` variables.
//!
//! Sections map to double-underscore paths, e.g.
//! `TELEGRAM_DISPATCH__BOT__USERNAME`, `TELEGRAM_DISPATCH__SERVER__MODE=polling`
//! or `TELEGRAM_DISPATCH__DATABASE__URL`.
//!
//! ```no_run
//! use telegram_dispatch::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration");
//! config.validate().expect("valid configuration");
//! ```

mod bot;
mod database;
mod error;
mod polling;
mod server;

pub use bot::BotConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use polling::PollingConfig;
pub use server::{LogFormat, RunMode, ServerConfig};

use serde::Deserialize;

/// Everything the binary needs to start.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub bot: BotConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    /// Absent means in-memory deduplication only
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

impl AppConfig {
    /// Reads `.env` (if any) and the process environment.
    ///
    /// Only `bot.username` and `bot.token` are required; every other
    /// section falls back to its defaults.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TELEGRAM_DISPATCH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks cross-field constraints the types cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bot.validate()?;
        self.server.validate()?;
        self.polling.validate()?;
        self.database
            .as_ref()
            .map_or(Ok(()), DatabaseConfig::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Sets `vars`, loads, then removes them again.
    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        for (key, value) in vars {
            env::set_var(format!("TELEGRAM_DISPATCH__{key}"), value);
        }
        let loaded = AppConfig::load();
        for (key, _) in vars {
            env::remove_var(format!("TELEGRAM_DISPATCH__{key}"));
        }
        loaded
    }

    const BOT: [(&str, &str); 2] = [("BOT__USERNAME", "DispatchBot"), ("BOT__TOKEN", "123:abc")];

    #[test]
    fn minimal_environment_uses_defaults() {
        let config = load_with(&BOT).expect("config should load");

        assert_eq!(config.bot.username, "DispatchBot");
        assert_eq!(config.bot.token.expose_secret(), "123:abc");
        assert!(config.bot.id.is_none());
        assert!(config.database.is_none());
        assert_eq!(config.server.mode, RunMode::Webhook);
        assert_eq!(config.polling.limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn every_section_can_be_overridden() {
        let mut vars = BOT.to_vec();
        vars.extend([
            ("BOT__ID", "42"),
            ("BOT__ADMINS", "10,20"),
            ("SERVER__PORT", "8443"),
            ("SERVER__MODE", "polling"),
            ("POLLING__LIMIT", "25"),
            ("DATABASE__URL", "postgresql://localhost/updates"),
        ]);
        let config = load_with(&vars).expect("config should load");

        assert_eq!(config.bot.id, Some(42));
        assert_eq!(config.bot.admin_ids().unwrap(), vec![10, 20]);
        assert_eq!(config.server.port, 8443);
        assert_eq!(config.server.mode, RunMode::Polling);
        assert_eq!(config.polling.limit, 25);
        assert_eq!(
            config.database.as_ref().map(|db| db.url.as_str()),
            Some("postgresql://localhost/updates")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bot_section_is_required() {
        assert!(matches!(load_with(&[]), Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn non_positive_admins_are_dropped_not_fatal() {
        let mut vars = BOT.to_vec();
        vars.push(("BOT__ADMINS", "-3,0,15"));
        let config = load_with(&vars).expect("config should load");
        assert!(config.validate().is_ok());

        let mut admins = crate::application::AdminAuthority::new();
        admins.enable_many(config.bot.admin_ids().unwrap());
        let ids: Vec<i64> = admins.list().iter().map(|id| id.value()).collect();
        assert_eq!(ids, vec![15]);
    }

    #[test]
    fn invalid_database_fails_validation() {
        let mut vars = BOT.to_vec();
        vars.push(("DATABASE__URL", "mysql://localhost/updates"));
        let config = load_with(&vars).expect("config should load");

        assert_eq!(config.validate(), Err(ValidationError::InvalidDatabaseUrl));
    }
}
