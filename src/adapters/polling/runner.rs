//! PollingRunner - Background loop driving the pull frontend.
//!
//! Each tick asks the dispatcher for one `getUpdates` batch. Non-fatal
//! failures (a transport hiccup, a rejected batch) are logged and retried
//! on the next tick; fatal dispatch errors stop the loop.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `poll_interval` | 1s | Pause between batches |
//! | `limit` | 100 | `limit` passed to `getUpdates` |
//! | `timeout` | 0s | Long-poll `timeout` passed to `getUpdates` |

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::application::{DispatchError, Dispatcher};

/// Configuration for the PollingRunner.
#[derive(Debug, Clone)]
pub struct PollingRunnerConfig {
    /// Pause between two batches.
    pub poll_interval: Duration,

    /// Maximum updates fetched per batch.
    pub limit: u32,

    /// Long-poll timeout in seconds.
    pub timeout: u64,
}

impl Default for PollingRunnerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            limit: 100,
            timeout: 0,
        }
    }
}

impl PollingRunnerConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Repeatedly runs the pull frontend of a shared dispatcher.
pub struct PollingRunner {
    dispatcher: Arc<Dispatcher>,
    config: PollingRunnerConfig,
}

impl PollingRunner {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self::with_config(dispatcher, PollingRunnerConfig::default())
    }

    pub fn with_config(dispatcher: Arc<Dispatcher>, config: PollingRunnerConfig) -> Self {
        Self { dispatcher, config }
    }

    pub fn config(&self) -> &PollingRunnerConfig {
        &self.config
    }

    /// Run until the shutdown channel flips to `true`.
    ///
    /// Returns `Err` only for fatal dispatch errors.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DispatchError> {
        let mut interval = time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_ms = self.config.poll_interval.as_millis() as u64,
            limit = self.config.limit,
            "polling for updates"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("polling stopped");
                        return Ok(());
                    }
                }

                _ = interval.tick() => {
                    self.poll_once().await?;
                }
            }
        }
    }

    /// Run one batch and return the number of updates processed.
    ///
    /// Non-fatal errors are logged and reported as zero processed updates.
    pub async fn poll_once(&self) -> Result<usize, DispatchError> {
        let outcome = self
            .dispatcher
            .handle_get_updates(Some(self.config.limit), Some(self.config.timeout))
            .await;

        match outcome {
            Ok(result) if result.is_ok() => {
                let count = result
                    .result
                    .as_ref()
                    .and_then(|value| value.as_array())
                    .map_or(0, Vec::len);
                if count > 0 {
                    debug!(count, "batch processed");
                }
                Ok(count)
            }
            Ok(result) => {
                warn!(
                    description = result.description().unwrap_or_default(),
                    "getUpdates batch not processed"
                );
                Ok(0)
            }
            Err(err) if err.is_fatal() => {
                error!(error = %err, "polling aborted");
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "polling batch failed");
                Ok(0)
            }
        }
    }
}
