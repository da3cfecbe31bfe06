//! Aggregated conversation metadata for list views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated metadata about one conversation, used for list views
/// without loading full transcripts.
///
/// A summary lacking `conversation_id` is invalid: it must be dropped by
/// [`to_conversation_stub`], never surfaced as a conversation with an
/// undefined identity.
///
/// [`to_conversation_stub`]: super::convert::to_conversation_stub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Conversation identifier. Absent in malformed rows.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Timestamp of the oldest record in the conversation.
    #[serde(default)]
    pub first_message_time: Option<DateTime<Utc>>,
    /// Timestamp of the newest record in the conversation.
    #[serde(default)]
    pub last_message_time: Option<DateTime<Utc>>,
    /// Number of stored records.
    #[serde(default)]
    pub message_count: u32,
    /// The most recent user question, if any.
    #[serde(default)]
    pub latest_user_query: Option<String>,
    /// The most recent assistant answer, if any.
    #[serde(default)]
    pub latest_agent_response: Option<String>,
}
