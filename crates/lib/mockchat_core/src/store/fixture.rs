//! JSON fixture store.
//!
//! Fixture files are re-read on every call so they can be edited while the
//! server runs. They are never written; runtime sessions and messages land in
//! an in-memory overlay that is merged into every read.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::{MemoryStore, SessionStore, StoreError};
use crate::models::{Message, Session};

/// Sessions fixture: a list of sessions or an object of id → session.
pub const SESSIONS_FILE: &str = "sessions.json";

/// History fixture: an object of session id → list of messages.
pub const HISTORY_FILE: &str = "history.json";

/// Read-only fixtures from a directory plus a runtime overlay.
#[derive(Debug)]
pub struct FixtureStore {
    dir: PathBuf,
    overlay: MemoryStore,
}

impl FixtureStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overlay: MemoryStore::new(),
        }
    }

    /// Directory the fixtures are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn fixture_sessions(&self) -> Vec<Session> {
        let path = self.dir.join(SESSIONS_FILE);
        match read_json(&path).await.and_then(|v| parse_sessions(v, &path)) {
            Ok(sessions) => sessions,
            Err(e) => {
                error!(path = %path.display(), "error reading sessions fixture: {e}");
                Vec::new()
            }
        }
    }

    /// Listed in the sessions fixture, or has a fixture transcript.
    async fn fixture_knows(&self, session_id: &str) -> bool {
        self.fixture_sessions().await.iter().any(|s| s.id == session_id)
            || !self.fixture_history(session_id).await.is_empty()
    }

    async fn fixture_history(&self, session_id: &str) -> Vec<Message> {
        let path = self.dir.join(HISTORY_FILE);
        match read_json(&path)
            .await
            .and_then(|v| parse_history(v, session_id, &path))
        {
            Ok(messages) => messages,
            Err(e) => {
                error!(path = %path.display(), "error reading history fixture: {e}");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl SessionStore for FixtureStore {
    async fn list_sessions(&self) -> Vec<Session> {
        let mut sessions = self.overlay.list_sessions().await;
        for session in self.fixture_sessions().await {
            if !sessions.iter().any(|s| s.id == session.id) {
                sessions.push(session);
            }
        }
        sessions
    }

    async fn history(&self, session_id: &str) -> Vec<Message> {
        let mut messages = self.fixture_history(session_id).await;
        messages.extend(self.overlay.history(session_id).await);
        messages
    }

    async fn record_session(&self, session: Session) -> Result<(), StoreError> {
        self.overlay.record_session(session).await
    }

    async fn append_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>,
    ) -> Result<(), StoreError> {
        if self.overlay.knows(session_id).await || self.fixture_knows(session_id).await {
            self.overlay.extend_history(session_id, messages).await;
        } else {
            debug!(%session_id, "not recording messages for unknown session");
        }
        Ok(())
    }
}

/// Read and parse a JSON file. A missing file reads as `null`.
async fn read_json(path: &Path) -> Result<Value, StoreError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "data file not found");
            return Ok(Value::Null);
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&content)?)
}

fn parse_sessions(value: Value, path: &Path) -> Result<Vec<Session>, StoreError> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        other => {
            return Err(StoreError::Layout(format!(
                "expected a list or object of sessions, found {}",
                json_kind(&other)
            )));
        }
    };
    Ok(parse_entries(entries, path))
}

fn parse_history(value: Value, session_id: &str, path: &Path) -> Result<Vec<Message>, StoreError> {
    let mut map = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(StoreError::Layout(format!(
                "expected an object of session id to messages, found {}",
                json_kind(&other)
            )));
        }
    };
    match map.remove(session_id) {
        None => {
            debug!(session_id, "no fixture history for session");
            Ok(Vec::new())
        }
        Some(Value::Array(items)) => Ok(parse_entries(items, path)),
        Some(other) => Err(StoreError::Layout(format!(
            "history for {session_id} should be a list, found {}",
            json_kind(&other)
        ))),
    }
}

/// Deserialize each entry, skipping (and logging) the ones that don't fit.
fn parse_entries<T: DeserializeOwned>(entries: Vec<Value>, path: &Path) -> Vec<T> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(path = %path.display(), index = idx, "skipping malformed fixture entry: {e}");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
