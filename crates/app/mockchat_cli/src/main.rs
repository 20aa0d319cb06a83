// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::time::Duration;

use clap::Parser;
use cli::{Cli, Commands};
use mockchat_client::ApiClient;
use mockchat_client::render::{render_message, render_sessions, render_transcript};

mod chat;
mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    if let Commands::Version = args.command {
        println!("{} {}", env!("CARGO_PKG_NAME"), mockchat_core::version());
        return Ok(());
    }

    let api = ApiClient::new(&args.api_url, Duration::from_secs(args.timeout_secs))?;
    log::debug!("using API at {}", api.base_url());

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(dispatch(&api, args.command))
}

async fn dispatch(api: &ApiClient, command: Commands) -> Result<()> {
    match command {
        Commands::New => {
            let session = api.create_session().await?;
            println!("{}\t{}", session.id, session.title);
        }
        Commands::Sessions => {
            let sessions = api.list_sessions().await?;
            if sessions.is_empty() {
                println!("No sessions yet.");
            } else {
                print!("{}", render_sessions(&sessions));
            }
        }
        Commands::History { session_id } => {
            let messages = api.history(&session_id).await?;
            if messages.is_empty() {
                println!("No messages in {session_id}.");
            } else {
                println!("{}", render_transcript(&messages));
            }
        }
        Commands::Ask {
            session_id,
            question,
        } => {
            let question = question.join(" ");
            if question.trim().is_empty() {
                return Err(Error::Custom("question must not be empty".into()));
            }
            let reply = api.ask(&session_id, question.trim()).await?;
            println!("{}", render_message(&reply));
        }
        Commands::Chat { session } => chat::run(api, session).await?,
        Commands::Version => {}
    }
    Ok(())
}
