//! Pure conversions between backend records and transcript types.
//!
//! No I/O happens here; everything is a deterministic transformation of
//! already-fetched data.

use super::message::Message;
use super::model::Conversation;
use super::record::BackendRecord;
use super::summary::ConversationSummary;

/// Reserved substring inside `user_query` that marks a record as
/// internal tooling rather than user dialogue.
///
/// This is a substring match, so genuine user text containing the marker
/// would be misclassified as well. The backend convention is preserved
/// here rather than fixed; treat it as a known limitation.
pub const CONTROL_MARKER: &str = "[tool]";

/// Maximum title/preview length derived from the latest user query.
const STUB_TITLE_MAX_CHARS: usize = 100;

/// Title used for conversations that have no user query yet.
pub const NEW_CONVERSATION_TITLE: &str = "New conversation";

/// Expands backend records into transcript messages.
///
/// Each record yields exactly two messages, user then assistant, both
/// carrying the record's timestamp. The result is stably sorted
/// ascending by timestamp, so relative order across records is
/// preserved and the user message always precedes its answer.
pub fn expand(records: &[BackendRecord]) -> Vec<Message> {
    let mut ordered: Vec<&BackendRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.timestamp);

    ordered
        .into_iter()
        .flat_map(|record| {
            [
                Message::with_id(
                    format!("{}-user", record.id),
                    record.user_query.clone(),
                    true,
                    record.timestamp,
                ),
                Message::with_id(
                    format!("{}-agent", record.id),
                    record.agent_response.clone(),
                    false,
                    record.timestamp,
                ),
            ]
        })
        .collect()
}

/// Converts a summary into a conversation stub for list views.
///
/// Returns `None` when the summary has no conversation identifier; such
/// rows are logged and dropped, never surfaced as a conversation with an
/// undefined identity. The transcript is left empty for later hydration.
pub fn to_conversation_stub(summary: &ConversationSummary) -> Option<Conversation> {
    let id = match summary.conversation_id.as_deref() {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => {
            tracing::warn!("[Convert] dropping summary without a conversation identifier");
            return None;
        }
    };

    let title = summary
        .latest_user_query
        .as_deref()
        .filter(|query| !query.trim().is_empty())
        .map(preview)
        .unwrap_or_else(|| NEW_CONVERSATION_TITLE.to_string());

    let timestamp = summary
        .last_message_time
        .or(summary.first_message_time)
        .unwrap_or_else(chrono::Utc::now);

    Some(Conversation {
        id,
        title: title.clone(),
        messages: Vec::new(),
        timestamp,
        last_message: title,
        message_count: Some(summary.message_count),
    })
}

/// Removes records whose `user_query` contains the control marker.
///
/// Passes records through unchanged when filtering is disabled. The
/// operation is idempotent: filtering twice yields the same result.
pub fn filter_control_records(records: Vec<BackendRecord>, enabled: bool) -> Vec<BackendRecord> {
    if !enabled {
        return records;
    }
    records
        .into_iter()
        .filter(|record| !record.user_query.contains(CONTROL_MARKER))
        .collect()
}

fn preview(query: &str) -> String {
    let truncated: String = query.chars().take(STUB_TITLE_MAX_CHARS).collect();
    if query.chars().count() > STUB_TITLE_MAX_CHARS {
        format!("{truncated}...")
    } else {
        truncated
    }
}
