//! Request handlers.

pub mod fallback;
pub mod health;
pub mod question;
pub mod sessions;

use mockchat_core::session_id;

use crate::error::{AppError, AppResult};

/// Reject ids that don't follow the `sess_` naming convention.
pub(crate) fn ensure_session_id(id: &str) -> AppResult<()> {
    if session_id::is_valid(id) {
        Ok(())
    } else {
        Err(AppError::Validation("Invalid session ID format".into()))
    }
}
