//! Session and history storage.
//!
//! Handlers only see the [`SessionStore`] trait. [`FixtureStore`] serves the
//! read-only JSON fixtures with an in-memory overlay for runtime writes;
//! [`MemoryStore`] is the overlay on its own and doubles as a test store.

mod fixture;
mod memory;

pub use fixture::{FixtureStore, HISTORY_FILE, SESSIONS_FILE};
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Message, Session};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected fixture layout: {0}")]
    Layout(String),
}

/// Read access to sessions and transcripts, plus the runtime writes the
/// question and create endpoints perform.
///
/// Reads never fail: unreadable data is logged and treated as empty.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// All known sessions, most recently created first.
    async fn list_sessions(&self) -> Vec<Session>;

    /// Ordered transcript of a session; empty when the id is unknown.
    async fn history(&self, session_id: &str) -> Vec<Message>;

    /// Remember a newly created session.
    async fn record_session(&self, session: Session) -> Result<(), StoreError>;

    /// Append messages to the end of a session's transcript. Messages for a
    /// session the store does not know are dropped.
    async fn append_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<(), StoreError>;
}
