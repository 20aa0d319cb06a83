//! API server configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mockchat_core::latency::{DEFAULT_MAX_DELAY, DEFAULT_MIN_DELAY};

/// Deployment environment. Controls how much detail 500 responses leak.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!(
                "unknown environment '{other}' (expected 'development' or 'production')"
            )),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3001").
    pub bind_addr: String,
    /// Browser origin allowed to make credentialed cross-origin calls.
    pub frontend_origin: String,
    /// Directory holding `sessions.json` and `history.json`.
    pub data_dir: PathBuf,
    pub environment: Environment,
    /// Lower bound of the simulated answer delay.
    pub min_delay: Duration,
    /// Upper bound of the simulated answer delay.
    pub max_delay: Duration,
    /// Keep created sessions and exchanged messages in memory so they show up
    /// in later listings and history reads.
    pub persist_sessions: bool,
}

impl Default for ApiConfig {
    /// | Field              | Default                 |
    /// |--------------------|-------------------------|
    /// | `bind_addr`        | `127.0.0.1:3001`        |
    /// | `frontend_origin`  | `http://localhost:5173` |
    /// | `data_dir`         | `fixtures`              |
    /// | `environment`      | development             |
    /// | delay              | 400–1200 ms             |
    /// | `persist_sessions` | `true`                  |
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".into(),
            frontend_origin: "http://localhost:5173".into(),
            data_dir: PathBuf::from("fixtures"),
            environment: Environment::default(),
            min_delay: DEFAULT_MIN_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            persist_sessions: true,
        }
    }
}
