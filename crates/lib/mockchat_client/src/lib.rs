//! # mockchat_client
//!
//! Client side of Mockchat: a typed HTTP client for the API, the transcript
//! state a chat front end keeps, and terminal rendering of messages and
//! tables.

pub mod client;
pub mod error;
pub mod render;
pub mod transcript;

pub use client::{ApiClient, ChatBackend, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, SendError};
pub use transcript::Transcript;
