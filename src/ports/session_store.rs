//! Session Store Port - Interface for per-conversation state.
//!
//! The store is a keyed map of sessions with per-key serialization. No
//! operation fails for a valid (non-empty) session id: an unknown id
//! always means "create a fresh session". Mutations return the updated
//! snapshot so callers never re-read after writing.
//!
//! # Concurrency
//!
//! Turns for one session must be processed in arrival order. `lock()`
//! hands out the session's turn lock; the orchestrator holds the guard
//! for the whole turn, so concurrent requests for the same session
//! serialize while different sessions proceed in parallel.

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use crate::domain::foundation::SessionId;
use crate::domain::intelligence::IntelligenceBundle;
use crate::domain::session::{SenderRole, Session};

/// Port for session state storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Acquires the per-session turn lock. The guard serializes all
    /// processing for this session id until dropped.
    async fn lock(&self, id: &SessionId) -> OwnedMutexGuard<()>;

    /// Returns the existing session, or creates a fresh one with all
    /// flags false and an empty log.
    async fn get_or_create(&self, id: &SessionId) -> Session;

    /// Appends a message to the session's log. The sequence number and
    /// receipt timestamp are assigned internally; no other field changes.
    /// Returns the updated snapshot.
    async fn append_message(
        &self,
        id: &SessionId,
        sender: SenderRole,
        text: &str,
        external_timestamp: i64,
    ) -> Session;

    /// Marks the session as a confirmed scam with the given confidence.
    /// Idempotent (last write wins).
    async fn mark_detected(&self, id: &SessionId, confidence: f64);

    /// Activates the persona responder. Callers ensure the session is
    /// already marked detected.
    async fn engage_agent(&self, id: &SessionId);

    /// Merges extracted intelligence into the session's bundle
    /// (per-field set union).
    async fn merge_intelligence(&self, id: &SessionId, bundle: &IntelligenceBundle);

    /// Marks the session concluded. One-way flip.
    async fn mark_concluded(&self, id: &SessionId);

    /// Records that the final report was delivered. One-way flip.
    async fn mark_callback_sent(&self, id: &SessionId);

    /// Returns the session if it exists. Monitoring read; does not create.
    async fn find(&self, id: &SessionId) -> Option<Session>;

    /// Returns snapshots of all sessions. Monitoring read.
    async fn list(&self) -> Vec<Session>;

    /// Removes a session entirely. Returns true if one existed.
    /// Management operation only; core logic never evicts.
    async fn purge(&self, id: &SessionId) -> bool;
}
