//! Question handler: answers with a canned response after a simulated delay.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use tracing::{debug, info};

use mockchat_core::models::Message;

use super::ensure_session_id;
use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{DataResponse, QuestionRequest};

const QUESTION_REQUIRED: &str = "Question is required and must be a non-empty string";

/// `POST /api/v1/sessions/{session_id}/question`
///
/// The session id is checked before the body, so a bad id wins over a bad
/// question. Malformed JSON and non-string questions are validation errors.
pub async fn question_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Result<Json<QuestionRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<Message>>> {
    ensure_session_id(&session_id)?;

    let question = match body {
        Ok(Json(req)) => req.question,
        Err(rejection) => {
            debug!(%session_id, "rejected question body: {rejection}");
            None
        }
    }
    .map(|q| q.trim().to_string())
    .filter(|q| !q.is_empty())
    .ok_or_else(|| AppError::Validation(QUESTION_REQUIRED.into()))?;

    let asked = Message::user(question.as_str(), state.clock.now());
    let response = state.responder.respond(&question);

    state.latency.wait().await;

    let reply = Message::ai(response.text.as_str(), response.attachment(), state.clock.now());

    if state.config.persist_sessions {
        state
            .store
            .append_messages(&session_id, vec![asked, reply.clone()])
            .await
            .map_err(|e| state.internal_error("Failed to process question", e))?;
    }

    info!(%session_id, reply_id = reply.id, "answered question");
    Ok(Json(DataResponse::new(reply)))
}
