//! Shared application state: the session store plus the publish loop.

use crate::error::{GameError, StoreError};
use crate::store::{MemoryStore, SessionStore};
use crate::types::{Session, SessionCode};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Safe character set for session codes (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 6;

/// Generate a random share code (6 characters)
fn generate_session_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Open a new session for `host_name` under a fresh collision-checked
    /// code.
    pub async fn create_session(&self, host_name: &str) -> Result<Session, GameError> {
        loop {
            let code = generate_session_code();
            let session =
                Session::create(host_name, code.clone(), chrono::Utc::now().to_rfc3339())?;
            match self.store.create(session.clone()).await {
                Ok(()) => {
                    tracing::info!("Created session {} hosted by {}", code, session.host);
                    return Ok(session);
                }
                // Code collision - roll a new one (extremely rare)
                Err(_) => continue,
            }
        }
    }

    /// Read–apply–publish with optimistic concurrency: run the pure `op` on
    /// the latest snapshot and compare-and-swap the result in. Losing the
    /// race to a concurrent writer just means rereading and rerunning the
    /// op on the fresh snapshot.
    pub async fn apply<F>(&self, code: &str, mut op: F) -> Result<Session, GameError>
    where
        F: FnMut(&Session) -> Result<Session, GameError>,
    {
        loop {
            let current = self.get_session(code).await?;
            let next = op(&current)?;
            match self.store.put(code, next, current.version).await {
                Ok(stored) => return Ok(stored),
                Err(StoreError::VersionConflict { .. }) => {
                    tracing::debug!("Lost publish race on session {}, retrying", code);
                    continue;
                }
                Err(_) => return Err(GameError::UnknownSession(code.to_string())),
            }
        }
    }

    pub async fn get_session(&self, code: &str) -> Result<Session, GameError> {
        self.store
            .get(code)
            .await
            .map_err(|_| GameError::UnknownSession(code.to_string()))
    }

    /// Snapshot stream for one session; closes when the record is removed.
    pub async fn subscribe(&self, code: &str) -> Result<broadcast::Receiver<Session>, GameError> {
        self.store
            .subscribe(code)
            .await
            .map_err(|_| GameError::UnknownSession(code.to_string()))
    }

    /// Remove the shared record for everyone.
    pub async fn delete_session(&self, code: &str) -> Result<(), GameError> {
        self.store
            .remove(code)
            .await
            .map_err(|_| GameError::UnknownSession(code.to_string()))?;
        tracing::info!("Deleted session {}", code);
        Ok(())
    }

    pub async fn expire_idle(&self, ttl: Duration) -> Vec<SessionCode> {
        self.store.expire_idle(ttl).await
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;

    #[tokio::test]
    async fn test_create_session_generates_share_code() {
        let state = AppState::new();
        let session = state.create_session("Ann").await.unwrap();

        assert_eq!(session.code.len(), CODE_LENGTH);
        assert!(session.code.bytes().all(|b| CODE_CHARS.contains(&b)));
        assert_eq!(session.phase, Phase::Lobby);
        assert_eq!(state.get_session(&session.code).await.unwrap(), session);
    }

    #[tokio::test]
    async fn test_create_session_rejects_empty_host() {
        let state = AppState::new();
        assert!(matches!(
            state.create_session("  ").await,
            Err(GameError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_apply_publishes_and_bumps_version() {
        let state = AppState::new();
        let session = state.create_session("Ann").await.unwrap();

        let updated = state.apply(&session.code, |s| s.join("Bob")).await.unwrap();
        assert_eq!(updated.version, 2);
        assert!(updated.players.contains_key("Bob"));

        // Engine failures pass straight through, record untouched
        let err = state.apply(&session.code, |s| s.join("Bob")).await;
        assert_eq!(err, Err(GameError::DuplicateName("Bob".to_string())));
        assert_eq!(state.get_session(&session.code).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_apply_on_unknown_session() {
        let state = AppState::new();
        assert_eq!(
            state.apply("NOSUCH", |s| s.join("Bob")).await,
            Err(GameError::UnknownSession("NOSUCH".to_string()))
        );
    }

    #[tokio::test]
    async fn test_delete_session() {
        let state = AppState::new();
        let session = state.create_session("Ann").await.unwrap();

        state.delete_session(&session.code).await.unwrap();
        assert_eq!(
            state.get_session(&session.code).await,
            Err(GameError::UnknownSession(session.code.clone()))
        );
        assert_eq!(
            state.delete_session(&session.code).await,
            Err(GameError::UnknownSession(session.code))
        );
    }
}
