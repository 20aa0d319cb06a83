use clap::{Parser, Subcommand};
use mockchat_client::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(name = "mockchat", version, about = "Terminal client for the Mockchat API")]
pub struct Cli {
    /// API root, including the version prefix.
    #[arg(long, env = "MOCKCHAT_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Seconds to wait for each request before giving up.
    #[arg(long, env = "MOCKCHAT_TIMEOUT_SECS", default_value_t = 15, global = true)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a session
    New,
    /// List sessions
    Sessions,
    /// Print the transcript of a session
    History { session_id: String },
    /// Ask a single question
    Ask {
        session_id: String,
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive chat; `/quit` or EOF exits
    Chat {
        /// Resume this session instead of creating one
        #[arg(long)]
        session: Option<String>,
    },
    /// Print version
    Version,
}
