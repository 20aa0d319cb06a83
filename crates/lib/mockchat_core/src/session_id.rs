//! Session identifiers.
//!
//! Ids are `sess_` followed by the first eight hex characters of a random
//! UUIDv4. Validation is purely syntactic: an id is accepted when it carries
//! the prefix, whether or not any store has heard of it.

use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use crate::models::Session;

/// Prefix every session id starts with.
pub const SESSION_ID_PREFIX: &str = "sess_";

const SUFFIX_LEN: usize = 8;

/// Generate a fresh session id.
pub fn generate() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{SESSION_ID_PREFIX}{}", &hex[..SUFFIX_LEN])
}

/// Whether `id` follows the session naming convention.
pub fn is_valid(id: &str) -> bool {
    id.starts_with(SESSION_ID_PREFIX)
}

/// Build a brand new session stamped at `now`.
///
/// The title uses the server's local time, e.g.
/// `Chat Session - 10/19/2026, 3:04:05 PM`.
pub fn new_session(now: DateTime<Utc>) -> Session {
    let local = now.with_timezone(&Local);
    Session {
        id: generate(),
        title: format!("Chat Session - {}", local.format("%-m/%-d/%Y, %-I:%M:%S %p")),
        created_at: now,
        updated_at: Some(now),
        message_count: Some(0),
    }
}
