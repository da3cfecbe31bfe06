//! Request payload schemas for the conversation store API.
//!
//! Response payloads are the receipt types in `colloquy_core::backend`;
//! only the request side lives here.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body of `POST /api/conversations/{userId}/{conversationId}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendRequest<'a> {
    pub user_query: &'a str,
    pub agent_response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Body of `POST /api/conversations/{userId}/search`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub search_term: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<&'a str>,
    pub limit: u32,
}

/// Body of `POST /api/conversations/{userId}/cleanup`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequest {
    pub days_old: u32,
}
