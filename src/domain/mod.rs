//! Domain layer containing dispatch rules and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, bot identity, errors)
//! - `update` - Typed view of inbound platform updates
//! - `command` - Command capability, tiers, naming and results
//! - `dispatch` - Cycle stages and the update filter hook

pub mod command;
pub mod dispatch;
pub mod foundation;
pub mod update;
