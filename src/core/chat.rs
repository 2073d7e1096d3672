//! Chat engine
//!
//! The ChatEngine owns the submit flow for a session:
//! 1. Ignores blank input
//! 2. Refuses input while a model call is already in flight
//! 3. Appends the user's message and sends the full history to the model
//! 4. Appends the reply, or a fixed apology flagged as an error
//!
//! The conversation is never rolled back; a failed exchange stays in the
//! history and is resent with the next message.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::persona;
use crate::conversation::Message;
use crate::providers::ModelClient;

use super::session::{Session, SessionStore};

/// Result of one submission
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// Messages appended to the conversation, oldest first
    pub appended: Vec<Message>,

    /// The model call failed and an apology was appended instead
    pub failed: bool,
}

impl Submission {
    fn ignored() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.appended.is_empty()
    }
}

/// Errors from the chat engine
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Session {0} is waiting for a reply")]
    Busy(Uuid),
}

/// The core chat engine
pub struct ChatEngine {
    client: Arc<dyn ModelClient>,
    sessions: Arc<SessionStore>,
}

impl ChatEngine {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Start evicting sessions left idle for `idle`.
    pub fn spawn_session_sweeper(&self, idle: Duration) -> JoinHandle<()> {
        self.sessions.clone().spawn_sweeper(idle)
    }

    pub async fn create_session(&self) -> Session {
        let session = self.sessions.create().await;
        tracing::info!(session = %session.id, "Session started");
        session
    }

    pub async fn session(&self, id: Uuid) -> Result<Session, ChatError> {
        self.sessions
            .get(id)
            .await
            .ok_or(ChatError::SessionNotFound(id))
    }

    pub async fn end_session(&self, id: Uuid) -> Result<(), ChatError> {
        if !self.sessions.remove(id).await {
            return Err(ChatError::SessionNotFound(id));
        }
        tracing::info!(session = %id, "Session ended");
        Ok(())
    }

    /// Submit user text to a session and wait for the exchange to finish.
    pub async fn submit(&self, id: Uuid, text: &str) -> Result<Submission, ChatError> {
        let user_message = Message::user(text);

        let history = self
            .sessions
            .with_session(id, |session| {
                if text.trim().is_empty() {
                    return Ok(None);
                }
                if session.pending {
                    return Err(ChatError::Busy(id));
                }
                session.conversation.push(user_message.clone());
                session.pending = true;
                Ok(Some(session.conversation.messages().to_vec()))
            })
            .await
            .ok_or(ChatError::SessionNotFound(id))??;

        let Some(history) = history else {
            return Ok(Submission::ignored());
        };

        tracing::debug!(session = %id, messages = history.len(), "Sending conversation to model");

        // Detached so the exchange completes even if the caller goes away.
        let client = self.client.clone();
        let sessions = self.sessions.clone();
        let exchange = tokio::spawn(async move {
            let reply = reply_message(id, client.generate(&history).await);
            record_reply(&sessions, id, reply).await
        });

        let recorded = match exchange.await {
            Ok(recorded) => recorded,
            Err(e) => record_reply(&self.sessions, id, reply_message::<String, _>(id, Err(e))).await,
        };

        let reply = recorded.ok_or(ChatError::SessionNotFound(id))?;
        Ok(Submission {
            failed: reply.is_error,
            appended: vec![user_message, reply],
        })
    }
}

/// Turn a model outcome into the message shown to the user.
///
/// The raw error is logged, never shown.
fn reply_message<T, E>(session: Uuid, outcome: Result<T, E>) -> Message
where
    T: Into<String>,
    E: Display,
{
    match outcome {
        Ok(text) => Message::model(text),
        Err(e) => {
            tracing::error!(session = %session, error = %e, "Failed to get a response from the model");
            Message::model_error(persona::APOLOGY)
        }
    }
}

/// Append the reply and reopen the session for input.
///
/// Returns `None` when the session was ended while the call was in flight.
async fn record_reply(sessions: &SessionStore, id: Uuid, reply: Message) -> Option<Message> {
    sessions
        .with_session(id, |session| {
            session.conversation.push(reply.clone());
            session.pending = false;
            tracing::debug!(session = %id, messages = session.conversation.messages().len(), "Reply recorded");
            reply
        })
        .await
}
