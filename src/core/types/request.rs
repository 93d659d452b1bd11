//! Request types passed through routing
//!
//! A [`Request`] is immutable once built: middleware that wants to change it
//! produces a new value through the `with_*` builders.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Metadata key used to pin a request to one model, bypassing selection
pub const FORCE_MODEL_KEY: &str = "force_model";

/// Metadata key carrying the request identifier
pub const REQUEST_ID_KEY: &str = "request_id";

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions
    System,
    /// End-user turn
    User,
    /// Model turn
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced the turn
    pub role: MessageRole,
    /// Turn text
    pub content: String,
}

impl Message {
    /// Create a message with an explicit role
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Completion request routed to one of the configured models
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    prompt: String,
    #[serde(default)]
    history: Vec<Message>,
    #[serde(default)]
    metadata: HashMap<String, Value>,
}

impl Request {
    /// Create a request with just a prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            history: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Build a request from a chat transcript
    ///
    /// The last user turn becomes the prompt and everything before it the
    /// history. A transcript without a user turn yields an empty prompt with
    /// the whole transcript as history.
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let last_user = messages
            .iter()
            .rposition(|m| m.role == MessageRole::User);

        match last_user {
            Some(index) => {
                let mut history = messages;
                let prompt = history.remove(index).content;
                // Turns after the last user message still belong to the history
                Self::new(prompt).with_history(history)
            }
            None => Self::new(String::new()).with_history(messages),
        }
    }

    /// Replace the conversation history (builder pattern)
    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }

    /// Add a metadata entry (builder pattern)
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Pin the request to one model identifier (builder pattern)
    pub fn force_model(self, model_id: impl Into<String>) -> Self {
        self.with_metadata(FORCE_MODEL_KEY, Value::String(model_id.into()))
    }

    /// Prompt text
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Conversation history, oldest first
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Request metadata
    pub fn metadata(&self) -> &HashMap<String, Value> {
        &self.metadata
    }

    /// Number of turns including the prompt itself
    pub fn turn_count(&self) -> usize {
        self.history.len() + usize::from(!self.prompt.trim().is_empty())
    }

    /// Model identifier forced through metadata, if any
    pub fn forced_model(&self) -> Option<&str> {
        self.metadata
            .get(FORCE_MODEL_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Request identifier attached by the gateway, if any
    pub fn request_id(&self) -> Option<&str> {
        self.metadata.get(REQUEST_ID_KEY).and_then(Value::as_str)
    }

    /// All textual content: history turns followed by the prompt
    pub fn text_segments(&self) -> impl Iterator<Item = &str> {
        self.history
            .iter()
            .map(|m| m.content.as_str())
            .chain(std::iter::once(self.prompt.as_str()))
    }
}
