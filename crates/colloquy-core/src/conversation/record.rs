//! Backend storage records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The server's storage unit: one stored question/answer pair.
///
/// A record is not a single message. It always encodes exactly one
/// question/answer exchange and expands to two [`Message`]s (user then
/// assistant) sharing the record's timestamp.
///
/// [`Message`]: super::message::Message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendRecord {
    /// Unique record identifier.
    pub id: String,
    /// Owner of the conversation.
    pub user_id: String,
    /// Conversation this record belongs to.
    pub conversation_id: String,
    /// The user's question.
    pub user_query: String,
    /// The assistant's answer.
    pub agent_response: String,
    /// Timestamp of the exchange.
    pub timestamp: DateTime<Utc>,
}
