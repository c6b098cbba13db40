//! Command model - capability, tiers, naming and results.

#[allow(clippy::module_inception)]
mod command;
mod context;
pub mod naming;
mod result;
mod tier;

pub use command::{factory, run_two_phase, Command, CommandFactory, PreExecution};
pub use context::CommandContext;
pub use naming::{GENERIC_COMMAND, GENERIC_MESSAGE_COMMAND};
pub use result::ExecutionResult;
pub use tier::CommandTier;
