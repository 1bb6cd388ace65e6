//! In-Memory Session Store Adapter
//!
//! Keeps all session state in process memory. This is the reference
//! backing store: sessions survive for the lifetime of the process and
//! are never evicted except through `purge`. Unbounded growth is a known
//! deployment concern, not handled here.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::foundation::SessionId;
use crate::domain::intelligence::IntelligenceBundle;
use crate::domain::session::{SenderRole, Session};
use crate::ports::SessionStore;

/// In-memory keyed session map with per-session turn locks.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
    locks: Arc<RwLock<HashMap<SessionId, Arc<Mutex<()>>>>>,
}

impl InMemorySessionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all stored sessions (useful for tests).
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
        self.locks.write().await.clear();
    }

    /// Returns the number of stored sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Runs a mutation against the session for `id`, creating it first if
    /// necessary, and returns whatever the mutation returns.
    async fn with_session<R>(&self, id: &SessionId, mutate: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(id.clone())
            .or_insert_with(|| Session::new(id.clone()));
        mutate(session)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn lock(&self, id: &SessionId) -> OwnedMutexGuard<()> {
        let existing = self.locks.read().await.get(id).cloned();
        let lock = match existing {
            Some(lock) => lock,
            None => self
                .locks
                .write()
                .await
                .entry(id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone(),
        };
        lock.lock_owned().await
    }

    async fn get_or_create(&self, id: &SessionId) -> Session {
        self.with_session(id, |session| session.clone()).await
    }

    async fn append_message(
        &self,
        id: &SessionId,
        sender: SenderRole,
        text: &str,
        external_timestamp: i64,
    ) -> Session {
        self.with_session(id, |session| {
            session.record_message(sender, text, external_timestamp);
            session.clone()
        })
        .await
    }

    async fn mark_detected(&self, id: &SessionId, confidence: f64) {
        self.with_session(id, |session| session.mark_detected(confidence))
            .await
    }

    async fn engage_agent(&self, id: &SessionId) {
        self.with_session(id, |session| session.engage_agent()).await
    }

    async fn merge_intelligence(&self, id: &SessionId, bundle: &IntelligenceBundle) {
        self.with_session(id, |session| session.merge_intelligence(bundle))
            .await
    }

    async fn mark_concluded(&self, id: &SessionId) {
        self.with_session(id, |session| session.mark_concluded())
            .await
    }

    async fn mark_callback_sent(&self, id: &SessionId) {
        self.with_session(id, |session| session.mark_callback_sent())
            .await
    }

    async fn find(&self, id: &SessionId) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    async fn list(&self) -> Vec<Session> {
        self.sessions.read().await.values().cloned().collect()
    }

    async fn purge(&self, id: &SessionId) -> bool {
        self.locks.write().await.remove(id);
        self.sessions.write().await.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::EngagementPhase;

    fn sid(s: &str) -> SessionId {
        SessionId::new(s).unwrap()
    }

    #[tokio::test]
    async fn get_or_create_returns_fresh_session() {
        let store = InMemorySessionStore::new();
        let session = store.get_or_create(&sid("a")).await;

        assert_eq!(session.id().as_str(), "a");
        assert!(!session.scam_detected());
        assert!(session.messages().is_empty());
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn get_or_create_is_stable_across_calls() {
        let store = InMemorySessionStore::new();
        store
            .append_message(&sid("a"), SenderRole::Scammer, "hello", 1)
            .await;

        let again = store.get_or_create(&sid("a")).await;
        assert_eq!(again.total_messages(), 1);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn append_message_assigns_sequence_numbers() {
        let store = InMemorySessionStore::new();
        store
            .append_message(&sid("a"), SenderRole::Scammer, "one", 1)
            .await;
        let session = store
            .append_message(&sid("a"), SenderRole::Scammer, "two", 2)
            .await;

        let seqs: Vec<u64> = session.messages().iter().map(|m| m.seq()).collect();
        assert_eq!(seqs, vec![0, 1]);
    }

    #[tokio::test]
    async fn mutations_on_unknown_id_create_the_session() {
        let store = InMemorySessionStore::new();
        store.mark_detected(&sid("ghost"), 0.9).await;

        let session = store.find(&sid("ghost")).await.unwrap();
        assert!(session.scam_detected());
    }

    #[tokio::test]
    async fn detection_and_engagement_walk_the_phases() {
        let store = InMemorySessionStore::new();
        let id = sid("a");

        store
            .append_message(&id, SenderRole::Scammer, "your account is blocked", 1)
            .await;
        store.mark_detected(&id, 0.85).await;
        store.engage_agent(&id).await;

        let session = store.find(&id).await.unwrap();
        assert_eq!(session.phase(), EngagementPhase::Engaging);
        assert_eq!(session.scam_confidence(), 0.85);
    }

    #[tokio::test]
    async fn merge_intelligence_unions() {
        let store = InMemorySessionStore::new();
        let id = sid("a");

        let mut bundle = IntelligenceBundle::new();
        bundle.phone_numbers.insert("9876543210".to_string());
        store.merge_intelligence(&id, &bundle).await;
        store.merge_intelligence(&id, &bundle).await;

        let session = store.find(&id).await.unwrap();
        assert_eq!(session.intelligence().phone_numbers.len(), 1);
    }

    #[tokio::test]
    async fn find_does_not_create() {
        let store = InMemorySessionStore::new();
        assert!(store.find(&sid("missing")).await.is_none());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn list_returns_all_sessions() {
        let store = InMemorySessionStore::new();
        store.get_or_create(&sid("a")).await;
        store.get_or_create(&sid("b")).await;

        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn purge_removes_session() {
        let store = InMemorySessionStore::new();
        store.get_or_create(&sid("a")).await;

        assert!(store.purge(&sid("a")).await);
        assert!(!store.purge(&sid("a")).await);
        assert!(store.find(&sid("a")).await.is_none());
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let store = InMemorySessionStore::new();
        store.get_or_create(&sid("a")).await;
        store.get_or_create(&sid("b")).await;

        store.clear().await;
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn session_lock_serializes_turns() {
        let store = InMemorySessionStore::new();
        let id = sid("a");

        let guard = store.lock(&id).await;

        let store2 = store.clone();
        let id2 = id.clone();
        let contender = tokio::spawn(async move {
            let _guard = store2.lock(&id2).await;
            store2
                .append_message(&id2, SenderRole::Scammer, "second", 2)
                .await;
        });

        // The contender cannot proceed while we hold the guard.
        store
            .append_message(&id, SenderRole::Scammer, "first", 1)
            .await;
        drop(guard);

        contender.await.unwrap();
        let session = store.find(&id).await.unwrap();
        assert_eq!(session.messages()[0].text(), "first");
        assert_eq!(session.messages()[1].text(), "second");
    }

    #[tokio::test]
    async fn locks_for_different_sessions_are_independent() {
        let store = InMemorySessionStore::new();
        let _guard_a = store.lock(&sid("a")).await;

        // Must not deadlock: a different session's lock is free.
        let _guard_b = store.lock(&sid("b")).await;
    }

    #[tokio::test]
    async fn concurrent_access_is_thread_safe() {
        let store = InMemorySessionStore::new();
        let mut handles = Vec::new();

        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let id = sid(&format!("session-{i}"));
                let _guard = store.lock(&id).await;
                store
                    .append_message(&id, SenderRole::Scammer, "hello", i)
                    .await;
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.session_count().await, 8);
    }
}
