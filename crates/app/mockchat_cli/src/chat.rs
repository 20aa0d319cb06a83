//! Interactive chat loop.
//!
//! Backend failures inside the loop are printed and the loop carries on;
//! only terminal I/O errors end it.

use std::io::Write;

use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

use mockchat_client::render::{render_message, render_sessions, render_transcript};
use mockchat_client::transcript::error_text;
use mockchat_client::{ApiClient, Transcript};

use crate::Result;

const HELP: &str = "Commands: /new, /switch <id>, /sessions, /quit";

/// Without `session` a new one is created first; failing that is the only
/// backend error that ends the command.
pub async fn run(api: &ApiClient, session: Option<String>) -> Result<()> {
    let session_id = match session {
        Some(id) => id,
        None => {
            let session = api.create_session().await?;
            println!("Started {} ({})", session.title, session.id);
            session.id
        }
    };

    let mut transcript = Transcript::new(session_id);
    if let Err(e) = transcript.load_history(api).await {
        println!("{}", error_text(&e));
    }
    show(&transcript);
    println!("{HELP}");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input.split_once(' ').unwrap_or((input, "")) {
            ("/quit", _) => break,
            ("/new", _) => match api.create_session().await {
                Ok(session) => {
                    println!("Started {} ({})", session.title, session.id);
                    open(api, &mut transcript, session.id).await;
                }
                Err(e) => println!("{}", error_text(&e)),
            },
            ("/switch", id) if !id.trim().is_empty() => {
                open(api, &mut transcript, id.trim().to_string()).await;
            }
            ("/sessions", _) => match api.list_sessions().await {
                Ok(sessions) => println!("{}", render_sessions(&sessions)),
                Err(e) => println!("{}", error_text(&e)),
            },
            (cmd, _) if cmd.starts_with('/') => println!("{HELP}"),
            _ if !transcript.can_send(input) => {}
            _ => match transcript.send(api, input).await {
                Ok(reply) => println!("{}\n", render_message(reply)),
                Err(e) => println!("{e}"),
            },
        }
        prompt()?;
    }

    info!("leaving session {}", transcript.session_id());
    Ok(())
}

/// Switch sessions, staying put when the history can't be loaded.
async fn open(api: &ApiClient, transcript: &mut Transcript, session_id: String) {
    match transcript.open_session(api, session_id).await {
        Ok(()) => show(transcript),
        Err(e) => {
            println!("{}", error_text(&e));
            println!("Still in session {}", transcript.session_id());
        }
    }
}

fn show(transcript: &Transcript) {
    println!("Session {}", transcript.session_id());
    if !transcript.messages().is_empty() {
        println!("{}\n", render_transcript(transcript.messages()));
    }
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
