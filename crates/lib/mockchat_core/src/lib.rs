//! # mockchat_core
//!
//! Core domain logic for Mockchat: the session/message model, table payload
//! validation, fixture-backed storage, and the canned response machinery the
//! API layer is wired from.

pub mod clock;
pub mod latency;
pub mod models;
pub mod responder;
pub mod session_id;
pub mod store;
pub mod table;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
