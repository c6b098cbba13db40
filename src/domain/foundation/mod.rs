//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers and error types that form the vocabulary
//! of the dispatch domain.

mod bot;
mod errors;
mod ids;

pub use bot::BotIdentity;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{UpdateId, UserId};
