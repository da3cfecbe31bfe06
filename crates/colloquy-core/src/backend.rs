//! Abstract conversation backend.
//!
//! This trait is the seam between the domain layer and whatever actually
//! stores conversations (the HTTP service in `colloquy-client`, or mocks
//! in tests). The state manager and the context flow depend only on this
//! trait, never on a concrete transport.

use crate::conversation::record::BackendRecord;
use crate::conversation::summary::ConversationSummary;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness report from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Acknowledgement of a stored question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppendReceipt {
    pub status: String,
    pub message: String,
}

/// Acknowledgement of a single conversation deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReceipt {
    pub status: String,
    pub message: String,
    pub deleted_count: u32,
}

/// Full-text search hits across a user's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub results: Vec<BackendRecord>,
    pub total_count: u32,
    pub search_term: String,
}

/// A bounded recent-context window for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextWindow {
    pub conversation_id: String,
    pub context: Vec<BackendRecord>,
    pub context_limit: u32,
}

/// Acknowledgement of a bulk age-based deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReceipt {
    pub status: String,
    pub message: String,
    pub deleted_count: u32,
    pub days_old: u32,
}

/// Acknowledgement of a multi-conversation deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteReceipt {
    pub status: String,
    pub total_deleted: u32,
    pub requested_deletions: u32,
}

/// Aggregate usage statistics for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_conversations: u32,
    pub total_messages: u32,
    pub days_back: u32,
    #[serde(default)]
    pub average_messages_per_conversation: f64,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
}

/// Domain operations against the remote conversation store.
///
/// Implementations are stateless request/response transformations; all
/// mutable conversation state lives in the callers. Input validation
/// (blank identifiers, empty text) happens before any network round-trip
/// and surfaces as `ColloquyError::Validation`.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Checks that the store is reachable.
    async fn health(&self) -> Result<HealthStatus>;

    /// Fetches conversation stubs for list views.
    async fn list_summaries(
        &self,
        user_id: &str,
        limit: Option<u32>,
        include_tools: bool,
    ) -> Result<Vec<ConversationSummary>>;

    /// Fetches the full record list for one conversation.
    async fn get_history(
        &self,
        user_id: &str,
        conversation_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<BackendRecord>>;

    /// Durably stores one question/answer pair.
    async fn append(
        &self,
        user_id: &str,
        conversation_id: &str,
        user_query: &str,
        agent_response: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<AppendReceipt>;

    /// Deletes one conversation and all its records.
    async fn remove(&self, user_id: &str, conversation_id: &str) -> Result<DeleteReceipt>;

    /// Full-text search across a user's records.
    async fn search(
        &self,
        user_id: &str,
        term: &str,
        conversation_id: Option<&str>,
        limit: u32,
    ) -> Result<SearchResults>;

    /// Fetches a bounded recent-context window.
    async fn get_context(
        &self,
        user_id: &str,
        conversation_id: &str,
        context_limit: u32,
    ) -> Result<ContextWindow>;

    /// Bulk-deletes conversations older than the threshold.
    async fn cleanup(&self, user_id: &str, days_old: u32) -> Result<CleanupReceipt>;

    /// Deletes many conversations in one call.
    async fn batch_remove(
        &self,
        user_id: &str,
        conversation_ids: &[String],
    ) -> Result<BatchDeleteReceipt>;

    /// Aggregate usage statistics.
    async fn analytics(&self, user_id: &str, days_back: u32) -> Result<AnalyticsReport>;
}

/// The assistant's reply to a prompt, produced by an external AI
/// collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// The assistant's answer text.
    pub content: String,
    /// The conversation identifier assigned by the server, when the
    /// responding service manages identity itself.
    pub conversation_id: Option<String>,
}

/// Caller-supplied producer of assistant replies.
///
/// The AI service that answers prompts is an external collaborator; the
/// send flows only orchestrate it. `conversation_id` is `None` until an
/// identifier is known, which lets the server assign one.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, conversation_id: Option<&str>, prompt: &str) -> Result<Reply>;
}
