//! Session request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::{debug, info};

use mockchat_core::models::{Message, Session};
use mockchat_core::session_id;

use super::ensure_session_id;
use crate::AppState;
use crate::error::AppResult;
use crate::models::{DataResponse, ListResponse};

/// `POST /api/v1/sessions/new`: create a session. Any request body is ignored.
pub async fn create_session_handler(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<DataResponse<Session>>)> {
    let session = session_id::new_session(state.clock.now());

    if state.config.persist_sessions {
        state
            .store
            .record_session(session.clone())
            .await
            .map_err(|e| state.internal_error("Failed to create new session", e))?;
    }

    info!(session_id = %session.id, "created session");
    Ok((StatusCode::CREATED, Json(DataResponse::new(session))))
}

/// `GET /api/v1/sessions`: list every known session.
pub async fn list_sessions_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<Session>>> {
    let sessions = state.store.list_sessions().await;
    debug!(count = sessions.len(), "listed sessions");
    Ok(Json(ListResponse::new(sessions)))
}

/// `GET /api/v1/sessions/{session_id}/history`: transcript of one session.
///
/// Only the id's shape is checked; unknown ids yield an empty list.
pub async fn history_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> AppResult<Json<ListResponse<Message>>> {
    ensure_session_id(&session_id)?;

    let history = state.store.history(&session_id).await;
    debug!(%session_id, count = history.len(), "fetched history");
    Ok(Json(ListResponse::for_session(history, session_id)))
}
