use std::sync::Arc;
use std::sync::mpsc;

use assert_cmd::Command;
use predicates::prelude::*;

use mockchat_api::AppState;
use mockchat_api::config::ApiConfig;
use mockchat_core::clock::SystemClock;
use mockchat_core::latency::NoLatency;
use mockchat_core::responder::FixedResponse;
use mockchat_core::store::MemoryStore;

fn mockchat() -> Command {
    let mut cmd = Command::cargo_bin("mockchat").unwrap();
    cmd.env_remove("MOCKCHAT_API_URL")
        .env_remove("MOCKCHAT_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

/// Serve the API from a background thread; returns the client base URL.
fn start_server() -> String {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let state = AppState {
                config: ApiConfig::default(),
                store: Arc::new(MemoryStore::new()),
                responder: Arc::new(FixedResponse(0)),
                latency: Arc::new(NoLatency),
                clock: Arc::new(SystemClock),
            };
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, mockchat_api::router(state)).await.unwrap();
        });
    });
    format!("http://{}/api/v1", rx.recv().unwrap())
}

#[test]
fn version_prints_name() {
    mockchat()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mockchat_cli"));
}

#[test]
fn help_lists_commands() {
    mockchat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"));
}

#[test]
fn invalid_api_url_fails() {
    mockchat()
        .args(["--api-url", "not a url", "sessions"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid API URL"));
}

#[test]
fn blank_question_fails_before_sending() {
    mockchat()
        .args(["ask", "sess_0000abcd", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question must not be empty"));
}

#[test]
fn unreachable_backend_fails() {
    mockchat()
        .args([
            "--api-url",
            "http://127.0.0.1:9/api/v1",
            "--timeout-secs",
            "2",
            "history",
            "sess_0000abcd",
        ])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn chat_survives_bad_switch_and_keeps_session() {
    let api_url = start_server();
    mockchat()
        .args(["--api-url", &api_url, "chat"])
        .write_stdin("/switch bad_id\nhello\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Started Chat Session"))
        .stdout(predicate::str::contains("Error: Invalid session ID format"))
        .stdout(predicate::str::contains("AI: I analyzed your question: \"hello\""))
        .stdout(predicate::str::contains("Processing Time"));
}

#[test]
fn chat_reports_backend_errors_without_exiting() {
    let api_url = start_server();
    mockchat()
        .args(["--api-url", &api_url, "chat", "--session", "sess_0000abcd"])
        .write_stdin("/switch not-a-session\n/sessions\n/bogus\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session sess_0000abcd"))
        .stdout(predicate::str::contains("Still in session sess_0000abcd"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn ask_prints_reply_and_table() {
    let api_url = start_server();
    mockchat()
        .args(["--api-url", &api_url, "ask", "sess_0000abcd", "how", "are", "we"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"how are we\""))
        .stdout(predicate::str::contains("Confidence Score"));
}
