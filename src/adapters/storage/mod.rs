//! Storage Adapters
//!
//! Implementations of the UpdateStore port that do not need a database.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemoryUpdateStore;
//!
//! let dispatcher = Dispatcher::new("MyBot")?.with_store(Arc::new(InMemoryUpdateStore::new()));
//! ```

mod in_memory;

pub use in_memory::InMemoryUpdateStore;
