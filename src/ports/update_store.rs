//! UpdateStore port - Durable record of processed updates.
//!
//! The dispatcher consults this store to reject updates that were already
//! processed, and the polling frontend reads the highest recorded id to
//! compute its next offset.
//!
//! ## Why Deduplication Matters
//!
//! Updates may be delivered more than once:
//! - Telegram retries a webhook delivery that timed out
//! - A poller restarts before acknowledging its last batch
//!
//! When no store is connected the dispatcher skips the duplicate check
//! and keeps running (fail-open).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::foundation::{DomainError, UpdateId, UserId};
use crate::domain::update::Update;

/// Record of a processed update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRecord {
    /// Platform-assigned sequence id.
    pub update_id: UpdateId,

    /// Type tag of the update, when recognized (e.g. "message").
    pub update_type: Option<String>,

    /// Sender derived from the update.
    pub sender_id: Option<UserId>,

    /// Chat the update belongs to.
    pub chat_id: Option<i64>,

    /// When the update was recorded.
    pub received_at: DateTime<Utc>,

    /// Original update payload.
    pub payload: Value,
}

impl UpdateRecord {
    /// Builds a record for an update received now.
    pub fn from_update(update: &Update) -> Self {
        Self {
            update_id: update.update_id,
            update_type: update.update_type().map(|t| t.as_str().to_string()),
            sender_id: update.sender_id(),
            chat_id: update.chat().map(|c| c.id),
            received_at: Utc::now(),
            payload: update.raw().clone(),
        }
    }
}

/// Port for the persistence collaborator.
#[async_trait]
pub trait UpdateStore: Send + Sync {
    /// Whether the backing store is reachable.
    async fn is_connected(&self) -> bool;

    /// Find a previously recorded update by its id.
    async fn find_update(&self, update_id: UpdateId) -> Result<Option<UpdateRecord>, DomainError>;

    /// Record an update as processed.
    ///
    /// Recording an id twice must not fail.
    async fn record_update(&self, update: &Update) -> Result<(), DomainError>;

    /// Highest update id recorded so far.
    async fn last_update_id(&self) -> Result<Option<UpdateId>, DomainError>;
}
