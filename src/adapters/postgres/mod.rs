//! PostgreSQL adapters - Database implementations of the persistence port.
//!
//! - `PostgresUpdateStore` - Processed-update records in `telegram_update`

mod update_store;

pub use update_store::PostgresUpdateStore;
