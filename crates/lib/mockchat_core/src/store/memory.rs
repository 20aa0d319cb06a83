//! In-memory store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{SessionStore, StoreError};
use crate::models::{Message, Session};

#[derive(Debug, Default)]
struct Inner {
    /// Newest first.
    sessions: Vec<Session>,
    history: HashMap<String, Vec<Message>>,
}

/// Sessions and transcripts held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with sessions (listed in the given order)
    /// and transcripts.
    pub fn seeded(sessions: Vec<Session>, history: HashMap<String, Vec<Message>>) -> Self {
        Self {
            inner: RwLock::new(Inner { sessions, history }),
        }
    }

    /// Whether `session_id` is listed or has a transcript.
    pub async fn knows(&self, session_id: &str) -> bool {
        let inner = self.inner.read().await;
        inner.history.contains_key(session_id) || inner.sessions.iter().any(|s| s.id == session_id)
    }

    /// Append without the membership check. The fixture store vouches for
    /// sessions that only exist on disk.
    pub(super) async fn extend_history(&self, session_id: &str, messages: Vec<Message>) {
        let mut inner = self.inner.write().await;
        let last_timestamp = messages.last().map(|m| m.timestamp);
        let transcript = inner.history.entry(session_id.to_string()).or_default();
        transcript.extend(messages);
        let count = transcript.len() as u64;

        if let Some(session) = inner.sessions.iter_mut().find(|s| s.id == session_id) {
            session.message_count = Some(count);
            if last_timestamp.is_some() {
                session.updated_at = last_timestamp;
            }
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn list_sessions(&self) -> Vec<Session> {
        self.inner.read().await.sessions.clone()
    }

    async fn history(&self, session_id: &str) -> Vec<Message> {
        self.inner
            .read()
            .await
            .history
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    async fn record_session(&self, session: Session) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.sessions.retain(|s| s.id != session.id);
        inner.sessions.insert(0, session);
        Ok(())
    }

    /// Drops messages for sessions this store has never seen, so stray ids
    /// cannot grow the overlay.
    async fn append_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<(), StoreError> {
        if !self.knows(session_id).await {
            debug!(%session_id, "not recording messages for unknown session");
            return Ok(());
        }
        self.extend_history(session_id, messages).await;
        Ok(())
    }
}
