//! Conversation history
//!
//! Keeps a short rolling window of turns per session key. The store is a
//! trait so the responder can be tested against a fake and a persistent
//! backend can be dropped in later; the only implementation today lives in
//! memory and is lost on restart.

#[path = "history_tests.rs"]
mod history_tests;

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use turco_types::{HistoryEntry, Role, SessionKey};

/// Default number of user/model pairs kept per session.
pub const DEFAULT_MAX_HISTORY: usize = 10;

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a turn, creating the session if needed and dropping the oldest
    /// turns once the window is full.
    async fn append(&self, key: &SessionKey, role: Role, content: &str);

    /// Owned copy of the session's turns, oldest first. Empty when unknown.
    async fn snapshot(&self, key: &SessionKey) -> Vec<HistoryEntry>;

    /// Forget everything recorded for `key`.
    async fn clear(&self, key: &SessionKey);

    /// Number of sessions currently holding at least one turn.
    async fn active_sessions(&self) -> usize;
}

/// In-memory history store
pub struct InMemoryHistory {
    sessions: RwLock<HashMap<SessionKey, Vec<HistoryEntry>>>,
    max_entries: usize,
}

impl InMemoryHistory {
    /// Store keeping [`DEFAULT_MAX_HISTORY`] pairs per session.
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    /// Store keeping `max_history` user/model pairs (`2 * max_history` turns).
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_entries: max_history.max(1) * 2,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn append(&self, key: &SessionKey, role: Role, content: &str) {
        let mut sessions = self.sessions.write().await;
        let history = sessions.entry(key.clone()).or_default();
        history.push(HistoryEntry::new(role, content));

        // Trimmed under the same lock, so readers never see the overflow.
        if history.len() > self.max_entries {
            let excess = history.len() - self.max_entries;
            history.drain(..excess);
        }
    }

    async fn snapshot(&self, key: &SessionKey) -> Vec<HistoryEntry> {
        let sessions = self.sessions.read().await;
        sessions.get(key).cloned().unwrap_or_default()
    }

    async fn clear(&self, key: &SessionKey) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(key).is_some() {
            tracing::debug!(session = %key, "Cleared conversation history");
        }
    }

    async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
