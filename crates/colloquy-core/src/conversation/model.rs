//! Conversation domain model.

use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A titled, ordered sequence of messages exchanged between a user and
/// an assistant.
///
/// The `id` has two lifecycle phases: *unbound* (a client-generated
/// placeholder used before any record has been durably stored) and
/// *bound* (the identifier confirmed by the server after the first
/// successful append). Once bound, the identifier is immutable for the
/// session; see [`ConversationIdentity`] for the state machine that
/// enforces this.
///
/// [`ConversationIdentity`]: super::identity::ConversationIdentity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation identifier (client-generated until bound).
    pub id: String,
    /// Human-readable title, derived from the latest user query.
    pub title: String,
    /// The loaded transcript, ordered by timestamp ascending. Empty for
    /// stubs whose transcript has not been hydrated yet.
    pub messages: Vec<Message>,
    /// Timestamp of the most recent activity.
    pub timestamp: DateTime<Utc>,
    /// Preview of the most recent message.
    pub last_message: String,
    /// Number of records stored server-side, when known.
    pub message_count: Option<u32>,
}

impl Conversation {
    /// Creates an empty conversation with the given client-generated id.
    pub fn empty(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            timestamp: Utc::now(),
            last_message: String::new(),
            message_count: None,
        }
    }

    /// Whether the transcript still needs to be fetched from the server.
    ///
    /// A stub produced from a summary has no messages loaded but a
    /// non-zero server-side count. A freshly created conversation also
    /// has no messages, but nothing to fetch either.
    pub fn needs_hydration(&self) -> bool {
        self.messages.is_empty() && self.message_count.unwrap_or(0) > 0
    }

    /// Appends a message and updates the activity preview fields.
    pub fn push_message(&mut self, message: Message) {
        self.last_message = message.content.clone();
        self.timestamp = message.timestamp;
        self.messages.push(message);
    }
}
