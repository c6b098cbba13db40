//! Telegram Dispatch - update ingestion and command dispatch for Telegram bots.
//!
//! Updates arrive through a webhook (push) or `getUpdates` (pull), are
//! filtered, classified, deduplicated and routed to the command that
//! handles them. Commands live in tiers (system, admin, user); higher
//! tiers shadow lower ones.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::{DispatchError, Dispatcher};
pub use domain::command::{Command, CommandContext, CommandTier, ExecutionResult};
pub use domain::update::Update;
