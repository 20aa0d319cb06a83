//! Chat transcript state.
//!
//! Holds the ordered messages of the open session and serializes sends: the
//! user message is appended as soon as a send starts, and no other send may
//! start until that one settles with a reply, an error or a timeout.

use std::sync::Arc;

use log::{error, warn};

use mockchat_core::clock::{Clock, SystemClock};
use mockchat_core::models::Message;

use crate::client::ChatBackend;
use crate::error::{ClientError, SendError};

const TIMEOUT_TEXT: &str = "Error: Request timed out. Please try again.";
const CONNECTION_TEXT: &str = "Error: Failed to connect to backend.";

/// Ticket for an outstanding send, handed back to [`Transcript::finish_send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    session_id: String,
    question: String,
    generation: u64,
}

impl PendingSend {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The trimmed question to submit.
    pub fn question(&self) -> &str {
        &self.question
    }
}

/// In-memory transcript of one session.
pub struct Transcript {
    session_id: String,
    messages: Vec<Message>,
    busy: bool,
    /// Bumped whenever the session changes so late replies can be discarded.
    generation: u64,
    clock: Arc<dyn Clock>,
}

impl Transcript {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_clock(session_id, Arc::new(SystemClock))
    }

    pub fn with_clock(session_id: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
            busy: false,
            generation: 0,
            clock,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether a request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether the send control should be enabled for `input`.
    pub fn can_send(&self, input: &str) -> bool {
        !self.busy && !input.trim().is_empty()
    }

    /// Switch to another session: clears messages and forgets any
    /// outstanding send.
    pub fn switch_session(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
        self.messages.clear();
        self.busy = false;
        self.generation += 1;
    }

    /// Replace the transcript with the session's stored history.
    ///
    /// On failure the transcript is left empty and the error returned.
    pub async fn load_history<B>(&mut self, backend: &B) -> Result<(), ClientError>
    where
        B: ChatBackend + ?Sized,
    {
        self.messages.clear();
        match backend.history(&self.session_id).await {
            Ok(history) => {
                self.messages = history;
                Ok(())
            }
            Err(e) => {
                error!("error fetching history for {}: {e}", self.session_id);
                Err(e)
            }
        }
    }

    /// Move to `session_id` once its history has loaded.
    ///
    /// On failure the current session and its messages are kept.
    pub async fn open_session<B>(
        &mut self,
        backend: &B,
        session_id: impl Into<String>,
    ) -> Result<(), ClientError>
    where
        B: ChatBackend + ?Sized,
    {
        let session_id = session_id.into();
        let history = backend.history(&session_id).await.map_err(|e| {
            error!("error fetching history for {session_id}: {e}");
            e
        })?;
        self.switch_session(session_id);
        self.messages = history;
        Ok(())
    }

    /// Start sending `input`: appends the user message and marks the
    /// transcript busy.
    pub fn begin_send(&mut self, input: &str) -> Result<PendingSend, SendError> {
        let question = input.trim();
        if question.is_empty() {
            return Err(SendError::EmptyInput);
        }
        if self.busy {
            return Err(SendError::Busy);
        }

        self.messages
            .push(Message::user(question, self.clock.now()));
        self.busy = true;

        Ok(PendingSend {
            session_id: self.session_id.clone(),
            question: question.to_string(),
            generation: self.generation,
        })
    }

    /// Settle a send. Appends the reply, or a synthetic AI error message, and
    /// clears the busy flag.
    ///
    /// Returns `None` when the transcript switched sessions in the meantime;
    /// the late outcome is dropped.
    pub fn finish_send(
        &mut self,
        pending: PendingSend,
        outcome: Result<Message, ClientError>,
    ) -> Option<&Message> {
        if pending.generation != self.generation {
            warn!(
                "discarding reply for {} after switching to {}",
                pending.session_id, self.session_id
            );
            return None;
        }

        Some(self.settle(outcome))
    }

    fn settle(&mut self, outcome: Result<Message, ClientError>) -> &Message {
        self.busy = false;
        let message = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                error!("error sending message: {e}");
                let mut msg = Message::ai(error_text(&e), None, self.clock.now());
                // Keep clear of the user message stamped in the same millisecond.
                msg.id += 1;
                msg
            }
        };
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Send `input` through `backend` and append the outcome.
    ///
    /// Backend failures do not surface as errors; they end up in the
    /// transcript as an AI error message, which is returned.
    pub async fn send<B>(&mut self, backend: &B, input: &str) -> Result<&Message, SendError>
    where
        B: ChatBackend + ?Sized,
    {
        let pending = self.begin_send(input)?;
        let outcome = backend.ask(&pending.session_id, &pending.question).await;
        Ok(self.settle(outcome))
    }
}

/// Transcript text for a failed send.
pub fn error_text(err: &ClientError) -> String {
    match err {
        ClientError::Timeout(_) => TIMEOUT_TEXT.to_string(),
        ClientError::Api { message, .. } => format!("Error: {message}"),
        _ => CONNECTION_TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::DateTime;
    use mockchat_core::clock::FixedClock;
    use mockchat_core::models::MessageKind;

    /// Backend returning queued outcomes and recording questions.
    #[derive(Default)]
    struct FakeBackend {
        history: Vec<Message>,
        fail_history: bool,
        replies: Mutex<Vec<Result<Message, ClientError>>>,
        asked: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn history(&self, _session_id: &str) -> Result<Vec<Message>, ClientError> {
            if self.fail_history {
                Err(ClientError::Timeout(Duration::from_millis(1)))
            } else {
                Ok(self.history.clone())
            }
        }

        async fn ask(&self, session_id: &str, question: &str) -> Result<Message, ClientError> {
            self.asked
                .lock()
                .unwrap()
                .push((session_id.to_string(), question.to_string()));
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(DateTime::from_timestamp(1_700_000_000, 0).unwrap()))
    }

    fn reply(text: &str) -> Message {
        Message::ai(text, None, DateTime::from_timestamp(1_700_000_001, 0).unwrap())
    }

    #[test]
    fn begin_send_appends_user_message_optimistically() {
        let mut t = Transcript::with_clock("sess_a", clock());
        let pending = t.begin_send("  hello  ").unwrap();
        assert_eq!(pending.question(), "hello");
        assert_eq!(pending.session_id(), "sess_a");
        assert!(t.is_busy());
        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.messages()[0].kind, MessageKind::User);
        assert_eq!(t.messages()[0].text, "hello");
    }

    #[test]
    fn blank_input_is_rejected() {
        let mut t = Transcript::with_clock("sess_a", clock());
        assert_eq!(t.begin_send("   "), Err(SendError::EmptyInput));
        assert!(!t.can_send(" \t"));
        assert!(t.messages().is_empty());
        assert!(!t.is_busy());
    }

    #[test]
    fn second_send_is_rejected_while_busy() {
        let mut t = Transcript::with_clock("sess_a", clock());
        let pending = t.begin_send("first").unwrap();
        assert!(!t.can_send("second"));
        assert_eq!(t.begin_send("second"), Err(SendError::Busy));
        assert_eq!(t.messages().len(), 1);

        t.finish_send(pending, Ok(reply("answer")));
        assert!(t.can_send("second"));
        assert!(t.begin_send("second").is_ok());
    }

    #[test]
    fn busy_clears_after_error_and_timeout() {
        let mut t = Transcript::with_clock("sess_a", clock());

        let pending = t.begin_send("one").unwrap();
        let msg = t
            .finish_send(pending, Err(ClientError::Timeout(Duration::from_secs(1))))
            .unwrap();
        assert_eq!(msg.kind, MessageKind::Ai);
        assert_eq!(msg.text, "Error: Request timed out. Please try again.");
        assert!(!t.is_busy());

        let pending = t.begin_send("two").unwrap();
        let msg = t
            .finish_send(
                pending,
                Err(ClientError::Api {
                    status: 400,
                    message: "Invalid session ID format".into(),
                }),
            )
            .unwrap();
        assert_eq!(msg.text, "Error: Invalid session ID format");
        assert!(!t.is_busy());

        let pending = t.begin_send("three").unwrap();
        let msg = t
            .finish_send(pending, Err(ClientError::Decode("bad".into())))
            .unwrap();
        assert_eq!(msg.text, "Error: Failed to connect to backend.");
        assert_eq!(t.messages().len(), 6);
    }

    #[test]
    fn error_message_id_differs_from_user_message() {
        let mut t = Transcript::with_clock("sess_a", clock());
        let pending = t.begin_send("one").unwrap();
        t.finish_send(pending, Err(ClientError::Decode("x".into())));
        assert_ne!(t.messages()[0].id, t.messages()[1].id);
    }

    #[test]
    fn late_reply_after_switch_is_dropped() {
        let mut t = Transcript::with_clock("sess_a", clock());
        let pending = t.begin_send("hello").unwrap();
        t.switch_session("sess_b");
        assert!(!t.is_busy());
        assert!(t.finish_send(pending, Ok(reply("late"))).is_none());
        assert!(t.messages().is_empty());
        assert_eq!(t.session_id(), "sess_b");
    }

    #[tokio::test]
    async fn send_round_trip_through_backend() {
        let backend = FakeBackend {
            replies: Mutex::new(vec![Ok(reply("canned"))]),
            ..FakeBackend::default()
        };
        let mut t = Transcript::with_clock("sess_a", clock());

        let msg = t.send(&backend, " hi ").await.unwrap();
        assert_eq!(msg.text, "canned");
        assert_eq!(t.messages().len(), 2);
        assert!(!t.is_busy());
        assert_eq!(
            backend.asked.lock().unwrap().as_slice(),
            &[("sess_a".to_string(), "hi".to_string())]
        );
    }

    #[tokio::test]
    async fn send_failure_lands_in_transcript() {
        let backend = FakeBackend {
            replies: Mutex::new(vec![Err(ClientError::Timeout(Duration::from_secs(15)))]),
            ..FakeBackend::default()
        };
        let mut t = Transcript::with_clock("sess_a", clock());
        let msg = t.send(&backend, "hi").await.unwrap();
        assert_eq!(msg.text, TIMEOUT_TEXT);
    }

    #[tokio::test]
    async fn load_history_replaces_messages() {
        let backend = FakeBackend {
            history: vec![reply("from history")],
            ..FakeBackend::default()
        };
        let mut t = Transcript::with_clock("sess_a", clock());
        t.begin_send("stale").unwrap();
        t.switch_session("sess_b");
        t.load_history(&backend).await.unwrap();
        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.messages()[0].text, "from history");
        assert!(!t.is_busy());
    }

    #[tokio::test]
    async fn load_history_keeps_outstanding_send() {
        let backend = FakeBackend::default();
        let mut t = Transcript::with_clock("sess_a", clock());
        let pending = t.begin_send("first").unwrap();

        t.load_history(&backend).await.unwrap();
        assert!(t.is_busy());
        assert_eq!(t.begin_send("second"), Err(SendError::Busy));

        assert!(t.finish_send(pending, Ok(reply("answer"))).is_some());
        assert!(!t.is_busy());
    }

    #[tokio::test]
    async fn open_session_switches_after_history_loads() {
        let backend = FakeBackend {
            history: vec![reply("from history")],
            ..FakeBackend::default()
        };
        let mut t = Transcript::with_clock("sess_a", clock());
        t.open_session(&backend, "sess_b").await.unwrap();
        assert_eq!(t.session_id(), "sess_b");
        assert_eq!(t.messages().len(), 1);
    }

    #[tokio::test]
    async fn failed_open_keeps_current_session() {
        let backend = FakeBackend {
            fail_history: true,
            replies: Mutex::new(vec![Ok(reply("answer"))]),
            ..FakeBackend::default()
        };
        let mut t = Transcript::with_clock("sess_a", clock());
        let pending = t.begin_send("first").unwrap();
        t.finish_send(pending, Ok(reply("kept")));

        assert!(t.open_session(&backend, "bad_id").await.is_err());
        assert_eq!(t.session_id(), "sess_a");
        assert_eq!(t.messages().len(), 2);

        t.send(&backend, "hello").await.unwrap();
        assert_eq!(
            backend.asked.lock().unwrap().as_slice(),
            &[("sess_a".to_string(), "hello".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_history_leaves_transcript_empty() {
        let backend = FakeBackend {
            fail_history: true,
            ..FakeBackend::default()
        };
        let mut t = Transcript::with_clock("sess_a", clock());
        let err = t.load_history(&backend).await.unwrap_err();
        assert!(err.is_timeout());
        assert!(t.messages().is_empty());
        assert!(!t.is_busy());
    }
}
