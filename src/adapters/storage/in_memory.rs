//! In-Memory Update Store Adapter
//!
//! Keeps processed updates in memory. Useful for testing, development and
//! single-process deployments that accept losing deduplication state on
//! restart.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UpdateId};
use crate::domain::update::Update;
use crate::ports::{UpdateRecord, UpdateStore};

/// In-memory storage for processed updates.
#[derive(Debug, Clone)]
pub struct InMemoryUpdateStore {
    records: Arc<RwLock<BTreeMap<UpdateId, UpdateRecord>>>,
    connected: Arc<AtomicBool>,
}

impl InMemoryUpdateStore {
    /// Create a new, connected store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Create a store that reports itself as unreachable.
    pub fn disconnected() -> Self {
        let store = Self::new();
        store.set_connected(false);
        store
    }

    /// Toggle reachability (useful for tests).
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Number of recorded updates.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Clear all recorded updates.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

impl Default for InMemoryUpdateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpdateStore for InMemoryUpdateStore {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn find_update(&self, update_id: UpdateId) -> Result<Option<UpdateRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(&update_id).cloned())
    }

    async fn record_update(&self, update: &Update) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records
            .entry(update.update_id)
            .or_insert_with(|| UpdateRecord::from_update(update));
        Ok(())
    }

    async fn last_update_id(&self) -> Result<Option<UpdateId>, DomainError> {
        let records = self.records.read().await;
        Ok(records.keys().next_back().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(id: i64) -> Update {
        Update::from_value(json!({"update_id": id})).unwrap()
    }

    #[tokio::test]
    async fn records_and_finds_updates() {
        let store = InMemoryUpdateStore::new();
        store.record_update(&update(5)).await.unwrap();

        let found = store.find_update(UpdateId::new(5)).await.unwrap();
        assert_eq!(found.map(|r| r.update_id), Some(UpdateId::new(5)));
        assert!(store.find_update(UpdateId::new(6)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recording_twice_keeps_one_record() {
        let store = InMemoryUpdateStore::new();
        store.record_update(&update(5)).await.unwrap();
        store.record_update(&update(5)).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn last_update_id_is_highest_recorded() {
        let store = InMemoryUpdateStore::new();
        assert_eq!(store.last_update_id().await.unwrap(), None);
        for id in [3, 9, 4] {
            store.record_update(&update(id)).await.unwrap();
        }
        assert_eq!(store.last_update_id().await.unwrap(), Some(UpdateId::new(9)));
    }

    #[tokio::test]
    async fn connectivity_can_be_toggled() {
        let store = InMemoryUpdateStore::disconnected();
        assert!(!store.is_connected().await);
        store.set_connected(true);
        assert!(store.is_connected().await);
    }
}
