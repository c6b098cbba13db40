//! DeduplicationGuard - at-most-once processing per update id.
//!
//! Backed by the update store. Without a connected store the check is
//! skipped entirely (fail-open). With one, concurrent deliveries of the same
//! id are serialized through an in-flight set, so only one gets admitted.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::foundation::{DomainError, UpdateId};
use crate::domain::update::Update;
use crate::ports::UpdateStore;

/// Whether an update should be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First sighting; the update has been recorded.
    Fresh,

    /// Already processed or currently being processed.
    Duplicate,
}

pub struct DeduplicationGuard {
    store: Option<Arc<dyn UpdateStore>>,
    in_flight: Mutex<HashSet<UpdateId>>,
}

impl DeduplicationGuard {
    pub fn new(store: Option<Arc<dyn UpdateStore>>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Checks `update` against the store and records it when fresh.
    ///
    /// Without a connected store every update is fresh. Store failures while
    /// checking are logged and treated as "not a duplicate"; failures while
    /// recording are returned.
    pub async fn admit(&self, update: &Update) -> Result<Admission, DomainError> {
        let Some(store) = self.connected_store().await else {
            return Ok(Admission::Fresh);
        };

        let update_id = update.update_id;
        if !self.in_flight.lock().await.insert(update_id) {
            debug!(update_id = update_id.value(), "update already in flight");
            return Ok(Admission::Duplicate);
        }

        let admission = check_and_record(store.as_ref(), update).await;
        self.in_flight.lock().await.remove(&update_id);
        admission
    }

    /// Whether the store already holds `update_id`.
    pub async fn is_duplicate(&self, update_id: UpdateId) -> bool {
        match self.connected_store().await {
            Some(store) => lookup(store.as_ref(), update_id).await,
            None => false,
        }
    }

    async fn connected_store(&self) -> Option<&Arc<dyn UpdateStore>> {
        let store = self.store.as_ref()?;
        store.is_connected().await.then_some(store)
    }
}

async fn lookup(store: &dyn UpdateStore, update_id: UpdateId) -> bool {
    match store.find_update(update_id).await {
        Ok(found) => found.is_some(),
        Err(err) => {
            warn!(update_id = update_id.value(), error = %err, "duplicate check failed, continuing");
            false
        }
    }
}

async fn check_and_record(store: &dyn UpdateStore, update: &Update) -> Result<Admission, DomainError> {
    if lookup(store, update.update_id).await {
        debug!(update_id = update.update_id.value(), "duplicate update ignored");
        return Ok(Admission::Duplicate);
    }
    store.record_update(update).await?;
    Ok(Admission::Fresh)
}
