//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Message used for 500s when the environment hides error details.
pub const GENERIC_INTERNAL_ERROR: &str = "Internal server error";

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Endpoint not found: {path}")]
    NotFound { path: String },

    /// Carries the message exactly as it should reach the caller; use
    /// [`crate::AppState::internal_error`] to build one.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, ErrorResponse::new(m)),
            AppError::NotFound { path } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    path: Some(path),
                    ..ErrorResponse::new("Endpoint not found")
                },
            ),
            AppError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(m)),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_400() {
        let resp = AppError::Validation("bad".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "bad");
        assert!(json.get("path").is_none());
    }

    #[tokio::test]
    async fn not_found_carries_path() {
        let resp = AppError::NotFound {
            path: "/nope".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "Endpoint not found");
        assert_eq!(json["path"], "/nope");
    }

    #[tokio::test]
    async fn internal_maps_to_500() {
        let resp = AppError::Internal(GENERIC_INTERNAL_ERROR.into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error"], GENERIC_INTERNAL_ERROR);
    }
}
