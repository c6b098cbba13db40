//! Application layer - the dispatch engine.
//!
//! This layer turns updates into command executions and coordinates the
//! persistence and transport ports.

pub mod admin;
pub mod classifier;
pub mod commands;
pub mod dedup;
pub mod dispatcher;
pub mod errors;
pub mod registry;
pub mod resolver;

pub use admin::AdminAuthority;
pub use classifier::UpdateClassifier;
pub use commands::{builtin_catalog, GenericCommand, GenericMessageCommand};
pub use dedup::{Admission, DeduplicationGuard};
pub use dispatcher::{Dispatcher, SessionState, NO_DATABASE_MESSAGE};
pub use errors::{DispatchError, RegistryError};
pub use registry::{Artifact, CommandCatalog, CommandLocation, CommandRegistry, Discovery};
pub use resolver::CommandResolver;
