//! Health endpoint.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{DataResponse, HealthStatus};

/// `GET /api/v1/health`: reports version, environment and whether the
/// fixture directory is present.
pub async fn health_handler(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<HealthStatus>>> {
    let fixtures_available = tokio::fs::try_exists(&state.config.data_dir)
        .await
        .unwrap_or(false);

    Ok(Json(DataResponse::new(HealthStatus {
        status: "ok".into(),
        version: mockchat_core::version().into(),
        environment: state.config.environment.to_string(),
        fixtures_available,
    })))
}
