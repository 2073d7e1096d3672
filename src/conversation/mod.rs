//! Conversation types and state management

use serde::{Deserialize, Serialize};

use crate::config::persona;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            is_error: false,
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
            is_error: false,
        }
    }

    /// A model-side message shown in place of a failed reply
    pub fn model_error(content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::model(content)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Ordered, append-only message history for one chat session.
///
/// Starts with the locally synthesized greeting, which is never sent to the
/// model as a real turn.
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_greeting(persona::GREETING)
    }

    pub fn with_greeting(greeting: &str) -> Self {
        Self {
            messages: vec![Message::model(greeting)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True until the user has sent anything
    pub fn is_fresh(&self) -> bool {
        self.messages.len() == 1
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
