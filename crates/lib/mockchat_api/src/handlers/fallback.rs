//! Catch-all for unknown routes and unsupported methods.

use axum::http::Uri;

use crate::error::AppError;

/// Any unmatched path or method → 404 `{ success: false, error, path }`.
pub async fn not_found_handler(uri: Uri) -> AppError {
    AppError::NotFound {
        path: uri.path().to_string(),
    }
}
