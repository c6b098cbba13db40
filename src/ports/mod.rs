//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the dispatch core and the outside world. Adapters implement these ports.
//!
//! - `UpdateStore` - Processed-update records (deduplication, offsets)
//! - `BotApi` - Outbound Bot API transport

mod bot_api;
mod update_store;

pub use bot_api::{BotApi, GetUpdatesRequest};
pub use update_store::{UpdateRecord, UpdateStore};
