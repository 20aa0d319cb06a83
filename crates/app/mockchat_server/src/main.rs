//! Mockchat API server binary.
//!
//! Serves the `/api/v1` chat endpoints over the JSON fixtures in `DATA_DIR`.
//! Settings come from flags, falling back to environment variables (a `.env`
//! file is honoured).

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use mockchat_api::config::{ApiConfig, Environment};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "mockchat_server", version, about = "Mockchat API server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Browser origin allowed to call the API cross-origin.
    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:5173")]
    frontend_url: String,

    /// Directory containing `sessions.json` and `history.json`.
    #[arg(long, env = "DATA_DIR", default_value = "fixtures")]
    data_dir: PathBuf,

    /// `development` or `production`; production hides error details.
    #[arg(long, env = "APP_ENV", default_value = "development")]
    environment: Environment,

    /// Lower bound of the simulated answer delay, in milliseconds.
    #[arg(long, env = "MIN_DELAY_MS", default_value_t = 400)]
    min_delay_ms: u64,

    /// Upper bound of the simulated answer delay, in milliseconds.
    #[arg(long, env = "MAX_DELAY_MS", default_value_t = 1200)]
    max_delay_ms: u64,

    /// Remember created sessions and exchanged messages in memory.
    #[arg(
        long,
        env = "PERSIST_SESSIONS",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    persist_sessions: bool,
}

impl Args {
    fn into_config(self) -> ApiConfig {
        ApiConfig {
            bind_addr: format!("{}:{}", self.host, self.port),
            frontend_origin: self.frontend_url,
            data_dir: self.data_dir,
            environment: self.environment,
            min_delay: Duration::from_millis(self.min_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            persist_sessions: self.persist_sessions,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,mockchat_api=debug,mockchat_core=debug".into()),
        )
        .init();

    let config = Args::parse().into_config();

    if !config.data_dir.is_dir() {
        warn!(data_dir = %config.data_dir.display(), "fixture directory not found, serving empty data");
    }

    let state = mockchat_api::AppState::from_config(config.clone());
    let app = mockchat_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;

    info!(addr = %local_addr, "REST API listening");
    info!(prefix = mockchat_api::routes::API_PREFIX, "API version");
    info!(
        environment = %config.environment,
        frontend_origin = %config.frontend_origin,
        persist_sessions = config.persist_sessions,
        "configuration"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_build_config() {
        let args = Args::try_parse_from([
            "mockchat_server",
            "--port",
            "4000",
            "--environment",
            "production",
            "--persist-sessions",
            "false",
            "--min-delay-ms",
            "0",
            "--max-delay-ms",
            "10",
        ])
        .unwrap();
        let config = args.into_config();
        assert!(config.bind_addr.ends_with(":4000"));
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.persist_sessions);
        assert_eq!(config.max_delay, Duration::from_millis(10));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!(
            Args::try_parse_from(["mockchat_server", "--environment", "staging"]).is_err()
        );
    }
}
