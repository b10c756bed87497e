//! In-memory session records

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use tracing::{debug, info};

/// Thread-safe session storage keyed by session id.
/// Uses DashMap so requests for different sessions never contend.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    records: Arc<DashMap<Id, Record>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record whose expiry is at or before `now`.
    /// Returns number of records removed
    pub fn remove_expired(&self, now: OffsetDateTime) -> usize {
        let start_len = self.records.len();
        self.records.retain(|_, record| record.expiry_date > now);
        start_len.saturating_sub(self.records.len())
    }

    /// Periodic sweep so abandoned sessions do not accumulate.
    pub async fn run_sweeper(self, period: Duration) {
        loop {
            tokio::time::sleep(period).await;
            let removed = self.remove_expired(OffsetDateTime::now_utc());
            if removed > 0 {
                info!("Swept {} expired sessions", removed);
            }
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        loop {
            match self.records.entry(record.id) {
                Entry::Occupied(_) => record.id = Id::default(),
                Entry::Vacant(slot) => {
                    slot.insert(record.clone());
                    return Ok(());
                }
            }
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        let Some(record) = self.records.get(session_id).map(|r| r.clone()) else {
            return Ok(None);
        };

        if record.expiry_date <= now {
            // Lazy deletion; a concurrent save with a fresh expiry survives.
            self.records
                .remove_if(session_id, |_, r| r.expiry_date <= now);
            debug!("Session expired, removed from store");
            return Ok(None);
        }

        Ok(Some(record))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.records.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use time::Duration as TimeDuration;

    fn record(expires_in: TimeDuration) -> Record {
        let mut data = HashMap::new();
        data.insert("apiKey".to_string(), serde_json::json!("ABC123"));
        Record {
            id: Id::default(),
            data,
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemorySessionStore::new();
        let rec = record(TimeDuration::hours(24));

        store.save(&rec).await.unwrap();
        let loaded = store.load(&rec.id).await.unwrap().unwrap();

        assert_eq!(loaded.id, rec.id);
        assert_eq!(loaded.data.get("apiKey"), Some(&serde_json::json!("ABC123")));
    }

    #[tokio::test]
    async fn test_unknown_id_loads_none() {
        let store = MemorySessionStore::new();
        assert!(store.load(&Id::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_record_is_dropped_on_load() {
        let store = MemorySessionStore::new();
        let rec = record(TimeDuration::seconds(-1));

        store.save(&rec).await.unwrap();
        assert_eq!(store.len(), 1);

        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_is_last_write_wins() {
        let store = MemorySessionStore::new();
        let mut rec = record(TimeDuration::hours(1));
        store.save(&rec).await.unwrap();

        rec.data.insert("apiKey".to_string(), serde_json::json!("XYZ789"));
        store.save(&rec).await.unwrap();

        let loaded = store.load(&rec.id).await.unwrap().unwrap();
        assert_eq!(loaded.data.get("apiKey"), Some(&serde_json::json!("XYZ789")));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_regenerates_colliding_id() {
        let store = MemorySessionStore::new();
        let existing = record(TimeDuration::hours(1));
        store.save(&existing).await.unwrap();

        let mut incoming = record(TimeDuration::hours(1));
        incoming.id = existing.id;
        store.create(&mut incoming).await.unwrap();

        assert_ne!(incoming.id, existing.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemorySessionStore::new();
        let rec = record(TimeDuration::hours(1));
        store.save(&rec).await.unwrap();

        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_expired() {
        let store = MemorySessionStore::new();
        store.save(&record(TimeDuration::hours(1))).await.unwrap();
        store.save(&record(TimeDuration::seconds(-5))).await.unwrap();
        store.save(&record(TimeDuration::seconds(-10))).await.unwrap();

        let removed = store.remove_expired(OffsetDateTime::now_utc());
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
    }
}
