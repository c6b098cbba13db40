//! Polling - background driver of the pull frontend.

mod runner;

pub use runner::{PollingRunner, PollingRunnerConfig};
