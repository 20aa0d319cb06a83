//! HTTP client for the Mockchat API.
//!
//! Every call is raced against a timer; when the timer wins the in-flight
//! request is dropped (cancelled) and [`ClientError::Timeout`] is returned so
//! callers can tell a slow backend from a broken one.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use mockchat_core::models::{Message, Session};

use crate::error::ClientError;

/// Base URL of a locally running server.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api/v1";

/// Client-side timeout applied to each request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The two calls a chat transcript needs. Lets the transcript be driven by a
/// fake in tests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn history(&self, session_id: &str) -> Result<Vec<Message>, ClientError>;

    async fn ask(&self, session_id: &str, question: &str) -> Result<Message, ClientError>;
}

/// Response envelope shared by every endpoint.
#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// Typed client over the `/api/v1` endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// `base_url` is the API root including the version prefix, e.g.
    /// `http://localhost:3001/api/v1`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            http: Client::new(),
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `POST /sessions/new`
    pub async fn create_session(&self) -> Result<Session, ClientError> {
        let url = self.endpoint(&["sessions", "new"])?;
        self.execute(self.http.post(url)).await
    }

    /// `GET /sessions`
    pub async fn list_sessions(&self) -> Result<Vec<Session>, ClientError> {
        let url = self.endpoint(&["sessions"])?;
        self.execute(self.http.get(url)).await
    }

    /// `GET /sessions/{id}/history`
    pub async fn history(&self, session_id: &str) -> Result<Vec<Message>, ClientError> {
        let url = self.endpoint(&["sessions", session_id, "history"])?;
        self.execute(self.http.get(url)).await
    }

    /// `POST /sessions/{id}/question`
    pub async fn ask(&self, session_id: &str, question: &str) -> Result<Message, ClientError> {
        let url = self.endpoint(&["sessions", session_id, "question"])?;
        let body = serde_json::json!({ "question": question });
        self.execute(self.http.post(url).json(&body)).await
    }

    /// Append path segments (percent-encoded) to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let call = async {
            let resp = request.send().await?;
            let status = resp.status();
            let bytes = resp.bytes().await?;
            debug!("API responded {status} ({} bytes)", bytes.len());
            decode(status, &bytes)
        };

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(self.timeout)),
        }
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn history(&self, session_id: &str) -> Result<Vec<Message>, ClientError> {
        ApiClient::history(self, session_id).await
    }

    async fn ask(&self, session_id: &str, question: &str) -> Result<Message, ClientError> {
        ApiClient::ask(self, session_id, question).await
    }
}

/// Unwrap the `{ success, data, error }` envelope.
fn decode<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ClientError> {
    let envelope: Envelope<T> = match serde_json::from_slice(bytes) {
        Ok(env) => env,
        Err(e) if status.is_success() => return Err(ClientError::Decode(e.to_string())),
        Err(_) => {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }
    };

    if !status.is_success() || !envelope.success {
        return Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope
                .error
                .unwrap_or_else(|| "request failed".to_string()),
        });
    }

    envelope
        .data
        .ok_or_else(|| ClientError::Decode("response has no data".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", DEFAULT_TIMEOUT),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com", DEFAULT_TIMEOUT),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn endpoints_extend_base_path() {
        let client = ApiClient::new("http://localhost:3001/api/v1", DEFAULT_TIMEOUT).unwrap();
        let url = client.endpoint(&["sessions", "sess_1", "history"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/v1/sessions/sess_1/history"
        );

        let trailing = ApiClient::new("http://localhost:3001/api/v1/", DEFAULT_TIMEOUT).unwrap();
        let url = trailing.endpoint(&["sessions"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/v1/sessions");
    }

    #[test]
    fn session_ids_are_percent_encoded() {
        let client = ApiClient::new(DEFAULT_API_URL, DEFAULT_TIMEOUT).unwrap();
        let url = client.endpoint(&["sessions", "a/b c", "history"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/v1/sessions/a%2Fb%20c/history"
        );
    }

    #[test]
    fn decode_unwraps_data() {
        let n: u32 = decode(StatusCode::OK, br#"{"success":true,"data":7}"#).unwrap();
        assert_eq!(n, 7);
    }

    #[test]
    fn decode_surfaces_error_envelope() {
        let err = decode::<u32>(
            StatusCode::BAD_REQUEST,
            br#"{"success":false,"error":"Invalid session ID format"}"#,
        )
        .unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid session ID format");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decode_handles_non_json_errors() {
        let err = decode::<u32>(StatusCode::BAD_GATEWAY, b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 502, .. }));
    }

    #[test]
    fn decode_rejects_unexpected_success_body() {
        let err = decode::<u32>(StatusCode::OK, br#""nope""#).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
