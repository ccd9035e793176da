//! Chat messages and the in-memory transcript.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Who produced a message: the local user, or the relay's echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    User,
    Server,
}

/// A single chat message.
///
/// Ids are derived from the creation timestamp and are not globally unique;
/// the transcript is ordered by insertion, not by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub origin: Origin,
    /// Milliseconds since Unix epoch.
    pub ts: i64,
}

impl ChatMessage {
    fn new(text: String, origin: Origin) -> Self {
        let ts = now_ms();
        Self { id: ts.to_string(), text, origin, ts }
    }

    /// A message the local user authored.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text.into(), Origin::User)
    }

    /// A message echoed back by the relay.
    #[must_use]
    pub fn server(text: impl Into<String>) -> Self {
        Self::new(text.into(), Origin::Server)
    }
}

/// Current time as milliseconds since Unix epoch.
fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Append-only ordered message list. Insertion order is the only ordering
/// guarantee; messages are never edited or removed individually.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
