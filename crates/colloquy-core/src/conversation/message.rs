//! Transcript message types.
//!
//! A message is one user or assistant utterance in the user-visible
//! transcript. Messages are immutable once created and ordered by
//! timestamp ascending.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single message in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: String,
    /// The message text.
    pub content: String,
    /// Whether the message was authored by the user (as opposed to the
    /// assistant).
    pub is_user: bool,
    /// Timestamp when the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a user message with a fresh identifier.
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            is_user: true,
            timestamp,
        }
    }

    /// Creates an assistant message with a fresh identifier.
    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            is_user: false,
            timestamp,
        }
    }

    /// Creates a message with a caller-chosen identifier.
    ///
    /// Used when expanding backend records, where deterministic ids
    /// (derived from the record id) allow merge-by-identifier
    /// reconciliation instead of blind overwrite.
    pub fn with_id(
        id: impl Into<String>,
        content: impl Into<String>,
        is_user: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            is_user,
            timestamp,
        }
    }
}
