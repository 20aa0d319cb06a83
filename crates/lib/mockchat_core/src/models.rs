//! Chat domain models.
//!
//! These types are shared by the API layer and the client, so the serde
//! attributes match the JSON wire format (camelCase, `type` tags).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation: identifier, display title and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// `sess_` followed by an eight character hex suffix.
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_count: Option<u64>,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Ai,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Ai => "ai",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Epoch milliseconds at creation. Not unique under concurrent sends.
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Attachment>,
}

impl Message {
    /// Build a user-authored message stamped at `now`.
    pub fn user(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis(),
            kind: MessageKind::User,
            text: text.into(),
            timestamp: now,
            data: None,
        }
    }

    /// Build an AI message stamped at `now`.
    pub fn ai(text: impl Into<String>, data: Option<Attachment>, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis(),
            kind: MessageKind::Ai,
            text: text.into(),
            timestamp: now,
            data,
        }
    }

    /// The table attached to this message, if any.
    pub fn table(&self) -> Option<&TablePayload> {
        match &self.data {
            Some(Attachment::Table(table)) => Some(table),
            _ => None,
        }
    }
}

/// Structured data attached to an AI message, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    Table(TablePayload),
    /// Any attachment type this build does not know how to display.
    #[serde(other)]
    Unsupported,
}

/// A header row plus data rows, rendered as a grid in the transcript.
///
/// Missing `headers` or `rows` deserialize as empty so that a malformed
/// payload reaches [`crate::table::validate`] instead of failing the whole
/// message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TablePayload {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl TablePayload {
    pub fn new<H, R>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = Vec<Cell>>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows.into_iter().collect(),
        }
    }
}

/// A single table cell: either text or a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(serde_json::Number),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n.into())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}
