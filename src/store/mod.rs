//! The synchronized-store seam.
//!
//! Sessions live behind this trait as whole records: read by code, replaced
//! by code, observed as a stream of full snapshots. There is no field-level
//! merging — `put` replaces the entire record, and only succeeds when the
//! caller saw the latest version, so concurrent writers cannot silently
//! clobber each other.

mod memory;

pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::types::{Session, SessionCode};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::broadcast;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a brand-new record under its code.
    async fn create(&self, session: Session) -> Result<(), StoreError>;

    async fn get(&self, code: &str) -> Result<Session, StoreError>;

    /// Compare-and-swap replace: succeeds only while the stored version
    /// still equals `expected_version`. Stores the record with the version
    /// bumped, pushes the stored snapshot to subscribers, and returns it.
    async fn put(
        &self,
        code: &str,
        session: Session,
        expected_version: u64,
    ) -> Result<Session, StoreError>;

    /// Snapshot stream for one session. The channel closes when the record
    /// is removed.
    async fn subscribe(&self, code: &str) -> Result<broadcast::Receiver<Session>, StoreError>;

    async fn remove(&self, code: &str) -> Result<(), StoreError>;

    /// Drop records untouched for longer than `ttl`, returning their codes.
    /// Stores with server-side expiry may implement this as a no-op.
    async fn expire_idle(&self, ttl: Duration) -> Vec<SessionCode>;
}
