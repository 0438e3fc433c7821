use super::SessionStore;
use crate::error::StoreError;
use crate::types::{Session, SessionCode};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};

/// Capacity of each per-session snapshot channel. A lagging reader misses
/// intermediate snapshots and catches up on the next one.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

struct Entry {
    session: Session,
    snapshots: broadcast::Sender<Session>,
    touched: Instant,
}

/// In-process session store. One record per code, one snapshot channel per
/// record; dropping an entry drops its sender and subscribers observe the
/// stream closing.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<SessionCode, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create(&self, session: Session) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&session.code) {
            return Err(StoreError::CodeInUse(session.code.clone()));
        }
        let (tx, _rx) = broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY);
        entries.insert(
            session.code.clone(),
            Entry {
                session,
                snapshots: tx,
                touched: Instant::now(),
            },
        );
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Session, StoreError> {
        self.entries
            .read()
            .await
            .get(code)
            .map(|e| e.session.clone())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn put(
        &self,
        code: &str,
        mut session: Session,
        expected_version: u64,
    ) -> Result<Session, StoreError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;
        if entry.session.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual: entry.session.version,
            });
        }

        session.version = expected_version + 1;
        entry.session = session.clone();
        entry.touched = Instant::now();
        // No receivers is fine; nobody may be watching yet
        let _ = entry.snapshots.send(session.clone());
        Ok(session)
    }

    async fn subscribe(&self, code: &str) -> Result<broadcast::Receiver<Session>, StoreError> {
        self.entries
            .read()
            .await
            .get(code)
            .map(|e| e.snapshots.subscribe())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn remove(&self, code: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn expire_idle(&self, ttl: Duration) -> Vec<SessionCode> {
        let mut entries = self.entries.write().await;
        let expired: Vec<SessionCode> = entries
            .iter()
            .filter(|(_, e)| e.touched.elapsed() >= ttl)
            .map(|(code, _)| code.clone())
            .collect();
        for code in &expired {
            entries.remove(code);
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::RecvError;

    fn session(code: &str) -> Session {
        Session::create(
            "Ann",
            code.to_string(),
            "2026-08-07T12:00:00Z".to_string(),
        )
        .expect("valid host name")
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        store.create(session("AAAAAA")).await.unwrap();

        let loaded = store.get("AAAAAA").await.unwrap();
        assert_eq!(loaded.host, "Ann");
        assert_eq!(loaded.version, 1);

        assert_eq!(
            store.get("ZZZZZZ").await,
            Err(StoreError::NotFound("ZZZZZZ".to_string()))
        );
    }

    #[tokio::test]
    async fn test_create_rejects_taken_code() {
        let store = MemoryStore::new();
        store.create(session("AAAAAA")).await.unwrap();
        assert_eq!(
            store.create(session("AAAAAA")).await,
            Err(StoreError::CodeInUse("AAAAAA".to_string()))
        );
    }

    #[tokio::test]
    async fn test_put_bumps_version_and_broadcasts() {
        let store = MemoryStore::new();
        store.create(session("AAAAAA")).await.unwrap();
        let mut rx = store.subscribe("AAAAAA").await.unwrap();

        let current = store.get("AAAAAA").await.unwrap();
        let next = current.join("Bob").unwrap();
        let stored = store.put("AAAAAA", next, current.version).await.unwrap();

        assert_eq!(stored.version, 2);
        assert_eq!(stored.players.len(), 2);

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.version, 2);
        assert!(snapshot.players.contains_key("Bob"));
    }

    #[tokio::test]
    async fn test_stale_put_is_rejected() {
        let store = MemoryStore::new();
        store.create(session("AAAAAA")).await.unwrap();

        let observed = store.get("AAAAAA").await.unwrap();
        let from_a = observed.join("Bob").unwrap();
        let from_b = observed.join("Carol").unwrap();

        store
            .put("AAAAAA", from_a, observed.version)
            .await
            .unwrap();

        // The concurrent writer saw version 1; its publish must not clobber
        assert_eq!(
            store.put("AAAAAA", from_b, observed.version).await,
            Err(StoreError::VersionConflict {
                expected: 1,
                actual: 2
            })
        );
        let current = store.get("AAAAAA").await.unwrap();
        assert!(current.players.contains_key("Bob"));
        assert!(!current.players.contains_key("Carol"));
    }

    #[tokio::test]
    async fn test_remove_closes_snapshot_stream() {
        let store = MemoryStore::new();
        store.create(session("AAAAAA")).await.unwrap();
        let mut rx = store.subscribe("AAAAAA").await.unwrap();

        store.remove("AAAAAA").await.unwrap();
        assert!(store.get("AAAAAA").await.is_err());
        assert_eq!(rx.recv().await, Err(RecvError::Closed));
    }

    #[tokio::test]
    async fn test_expire_idle_sweeps_only_stale_records() {
        let store = MemoryStore::new();
        store.create(session("AAAAAA")).await.unwrap();

        assert!(store.expire_idle(Duration::from_secs(3600)).await.is_empty());
        assert!(store.get("AAAAAA").await.is_ok());

        let expired = store.expire_idle(Duration::ZERO).await;
        assert_eq!(expired, vec!["AAAAAA".to_string()]);
        assert!(store.get("AAAAAA").await.is_err());
    }
}
