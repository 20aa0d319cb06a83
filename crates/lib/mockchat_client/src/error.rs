//! Client error types.

use std::time::Duration;

use thiserror::Error;

/// Failures talking to the API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not settle within the client-side timeout and was
    /// cancelled.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The API answered with an error envelope or a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Connection, transport or body read failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// The response body was not the expected JSON shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }
}

/// Reasons the transcript refuses to start a send.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("message is empty")]
    EmptyInput,

    #[error("a previous message is still being sent")]
    Busy,
}
