//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the dispatcher to external systems:
//! - `telegram` - Bot API client (reqwest)
//! - `storage` - In-memory update store
//! - `postgres` - PostgreSQL update store
//! - `http` - Webhook endpoint (axum)
//! - `polling` - Background `getUpdates` loop

pub mod http;
pub mod polling;
pub mod postgres;
pub mod storage;
pub mod telegram;

pub use http::webhook::{webhook_router, WebhookAppState};
pub use polling::{PollingRunner, PollingRunnerConfig};
pub use postgres::PostgresUpdateStore;
pub use storage::InMemoryUpdateStore;
pub use telegram::TelegramApi;
