//! # mockchat_api
//!
//! HTTP API library for Mockchat.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

use std::any::Any;
use std::fmt::Display;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use mockchat_core::clock::{Clock, SystemClock};
use mockchat_core::latency::{Latency, RandomLatency};
use mockchat_core::responder::{RandomResponses, ResponseSource};
use mockchat_core::store::{FixtureStore, SessionStore};

use crate::config::ApiConfig;
use crate::error::{AppError, GENERIC_INTERNAL_ERROR};
use crate::handlers::{fallback, health, question, sessions};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Session and transcript storage.
    pub store: Arc<dyn SessionStore>,
    /// Picks the canned answer for a question.
    pub responder: Arc<dyn ResponseSource>,
    /// Delay applied before answering.
    pub latency: Arc<dyn Latency>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Production wiring: fixtures from `config.data_dir`, random answers,
    /// random latency within the configured bounds, wall-clock time.
    pub fn from_config(config: ApiConfig) -> Self {
        Self {
            store: Arc::new(FixtureStore::new(config.data_dir.clone())),
            responder: Arc::new(RandomResponses),
            latency: Arc::new(RandomLatency::new(config.min_delay, config.max_delay)),
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Log an unexpected failure and build the 500 the caller will see.
    ///
    /// Production responses only carry `context`; other environments append
    /// the underlying error.
    pub fn internal_error(&self, context: &str, err: impl Display) -> AppError {
        error!("{context}: {err}");
        if self.config.environment.is_production() {
            AppError::Internal(context.to_string())
        } else {
            AppError::Internal(format!("{context}: {err}"))
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let expose_panics = !state.config.environment.is_production();

    let api = Router::new()
        .route(routes::GET_HEALTH, get(health::health_handler))
        .route(
            routes::POST_SESSIONS_NEW,
            post(sessions::create_session_handler),
        )
        .route(routes::GET_SESSIONS, get(sessions::list_sessions_handler))
        .route(routes::GET_SESSION_HISTORY, get(sessions::history_handler))
        .route(
            routes::POST_SESSION_QUESTION,
            post(question::question_handler),
        )
        .method_not_allowed_fallback(fallback::not_found_handler);

    Router::new()
        .merge(api)
        .fallback(fallback::not_found_handler)
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(panic, expose_panics),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Allow the configured frontend origin, with credentials.
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    match config.frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!(origin = %config.frontend_origin, "invalid frontend origin, CORS disabled: {e}");
            cors
        }
    }
}

/// Turn a handler panic into the standard 500 envelope.
fn panic_response(panic: Box<dyn Any + Send + 'static>, expose: bool) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("unhandled error: {detail}");

    let message = if expose {
        detail
    } else {
        GENERIC_INTERNAL_ERROR.to_string()
    };
    AppError::Internal(message).into_response()
}
