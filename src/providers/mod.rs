//! Model provider integration

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

use crate::conversation::{Message, Role};

pub use gemini::GeminiProvider;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// A text-generation backend that answers a conversation.
///
/// One call is one outbound request: no retries, no streaming.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, history: &[Message]) -> Result<String, ProviderError>;
}

/// The turns that are actually sent to the model.
///
/// The leading greeting is synthesized locally, so it is dropped when it is
/// the first message and comes from the model. Nothing else is filtered.
pub fn outbound_turns(history: &[Message]) -> &[Message] {
    match history.first() {
        Some(first) if first.role == Role::Model => &history[1..],
        _ => history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_is_dropped() {
        let history = vec![Message::model("greeting"), Message::user("hi")];
        assert_eq!(outbound_turns(&history), &[Message::user("hi")]);
    }

    #[test]
    fn test_later_model_messages_pass_through() {
        let history = vec![
            Message::model("greeting"),
            Message::user("hi"),
            Message::model("hello"),
            Message::user("what is a transistor?"),
        ];
        assert_eq!(outbound_turns(&history), &history[1..]);
    }

    #[test]
    fn test_leading_user_message_is_kept() {
        let history = vec![Message::user("hi"), Message::model("hello")];
        assert_eq!(outbound_turns(&history), &history[..]);
        assert!(outbound_turns(&[]).is_empty());
    }
}
