//! Pull-mode settings

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::polling::PollingRunnerConfig;

/// `getUpdates` loop settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Pause between batches in milliseconds
    pub interval_ms: u64,
    /// Updates per call (Telegram accepts 1-100)
    pub limit: u32,
    /// Long-poll timeout in seconds; 0 is short polling
    pub timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            limit: 100,
            timeout_secs: 0,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn runner_config(&self) -> PollingRunnerConfig {
        PollingRunnerConfig::default()
            .with_poll_interval(self.interval())
            .with_limit(self.limit)
            .with_timeout(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.interval_ms == 0 {
            return Err(ValidationError::InvalidPollingInterval);
        }
        if !(1..=100).contains(&self.limit) {
            return Err(ValidationError::InvalidPollingLimit);
        }
        Ok(())
    }
}
