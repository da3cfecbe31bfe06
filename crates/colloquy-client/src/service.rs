//! HTTP conversation service.
//!
//! Implements [`ConversationBackend`] against the remote conversation
//! store. The service owns no mutable state; it validates inputs,
//! builds request specs with the configured per-operation deadline and
//! hands them to the transport. Classified transport errors propagate
//! unchanged.

use crate::config::{ClientConfig, TimeoutBudgets};
use crate::transport::{RequestSpec, Transport};
use crate::wire::{AppendRequest, CleanupRequest, SearchRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use colloquy_core::backend::{
    AnalyticsReport, AppendReceipt, BatchDeleteReceipt, CleanupReceipt, ContextWindow,
    ConversationBackend, DeleteReceipt, HealthStatus, SearchResults,
};
use colloquy_core::context::ContextSession;
use colloquy_core::conversation::record::BackendRecord;
use colloquy_core::conversation::summary::ConversationSummary;
use colloquy_core::error::{ColloquyError, Result};
use colloquy_core::manager::ConversationManager;
use std::sync::Arc;

/// Stateless client for the conversation store API.
#[derive(Clone)]
pub struct ConversationService {
    transport: Transport,
    timeouts: TimeoutBudgets,
    filter_control: bool,
}

impl ConversationService {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            transport: Transport::new(config),
            timeouts: config.timeouts.clone(),
            filter_control: config.filter_control_records,
        }
    }

    /// Builds a state manager over this service, carrying the
    /// configured control-record filtering.
    pub fn manager(self: Arc<Self>) -> ConversationManager {
        let filter = self.filter_control;
        ConversationManager::new(self).with_control_filter(filter)
    }

    /// Builds a context-based session over this service, carrying the
    /// configured control-record filtering.
    pub fn context_session(self: Arc<Self>, user_id: impl Into<String>) -> ContextSession {
        let filter = self.filter_control;
        ContextSession::new(self, user_id).with_control_filter(filter)
    }
}

/// Rejects blank required fields before any network round-trip.
fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ColloquyError::validation(format!(
            "{field} must not be blank"
        )))
    } else {
        Ok(())
    }
}

#[async_trait]
impl ConversationBackend for ConversationService {
    async fn health(&self) -> Result<HealthStatus> {
        self.transport
            .execute(RequestSpec::get("/api/health", self.timeouts.health))
            .await
    }

    async fn list_summaries(
        &self,
        user_id: &str,
        limit: Option<u32>,
        include_tools: bool,
    ) -> Result<Vec<ConversationSummary>> {
        require("userId", user_id)?;

        let mut path = format!("/api/conversations/{user_id}?include_tools={include_tools}");
        if let Some(limit) = limit {
            path.push_str(&format!("&limit={limit}"));
        }
        self.transport
            .execute(RequestSpec::get(path, self.timeouts.list_summaries))
            .await
    }

    async fn get_history(
        &self,
        user_id: &str,
        conversation_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<BackendRecord>> {
        require("userId", user_id)?;
        require("conversationId", conversation_id)?;

        let mut path = format!("/api/conversations/{user_id}/{conversation_id}");
        if let Some(limit) = limit {
            path.push_str(&format!("?limit={limit}"));
        }
        self.transport
            .execute(RequestSpec::get(path, self.timeouts.history))
            .await
    }

    async fn append(
        &self,
        user_id: &str,
        conversation_id: &str,
        user_query: &str,
        agent_response: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<AppendReceipt> {
        require("userId", user_id)?;
        require("conversationId", conversation_id)?;
        require("userQuery", user_query)?;
        require("agentResponse", agent_response)?;

        let body = serde_json::to_value(AppendRequest {
            user_query,
            agent_response,
            timestamp,
        })?;
        let path = format!("/api/conversations/{user_id}/{conversation_id}");
        tracing::debug!("[ConversationService] appending record to {conversation_id}");
        self.transport
            .execute(RequestSpec::post(path, body, self.timeouts.append))
            .await
    }

    async fn remove(&self, user_id: &str, conversation_id: &str) -> Result<DeleteReceipt> {
        require("userId", user_id)?;
        require("conversationId", conversation_id)?;

        let path = format!("/api/conversations/{user_id}/{conversation_id}");
        tracing::info!("[ConversationService] deleting conversation {conversation_id}");
        self.transport
            .execute(RequestSpec::delete(path, self.timeouts.delete))
            .await
    }

    async fn search(
        &self,
        user_id: &str,
        term: &str,
        conversation_id: Option<&str>,
        limit: u32,
    ) -> Result<SearchResults> {
        require("userId", user_id)?;
        require("searchTerm", term)?;

        let body = serde_json::to_value(SearchRequest {
            search_term: term,
            conversation_id,
            limit,
        })?;
        let path = format!("/api/conversations/{user_id}/search");
        self.transport
            .execute(RequestSpec::post(path, body, self.timeouts.search))
            .await
    }

    async fn get_context(
        &self,
        user_id: &str,
        conversation_id: &str,
        context_limit: u32,
    ) -> Result<ContextWindow> {
        require("userId", user_id)?;
        require("conversationId", conversation_id)?;

        let path = format!(
            "/api/conversations/{user_id}/{conversation_id}/context?context_limit={context_limit}"
        );
        self.transport
            .execute(RequestSpec::get(path, self.timeouts.context))
            .await
    }

    async fn cleanup(&self, user_id: &str, days_old: u32) -> Result<CleanupReceipt> {
        require("userId", user_id)?;

        let body = serde_json::to_value(CleanupRequest { days_old })?;
        let path = format!("/api/conversations/{user_id}/cleanup");
        tracing::info!("[ConversationService] cleaning up conversations older than {days_old} days");
        self.transport
            .execute(RequestSpec::post(path, body, self.timeouts.cleanup))
            .await
    }

    async fn batch_remove(
        &self,
        user_id: &str,
        conversation_ids: &[String],
    ) -> Result<BatchDeleteReceipt> {
        require("userId", user_id)?;
        if conversation_ids.is_empty() {
            return Err(ColloquyError::validation(
                "conversationIds must not be empty",
            ));
        }

        let body = serde_json::to_value(conversation_ids)?;
        let path = format!("/api/conversations/{user_id}/batch-delete");
        tracing::info!(
            "[ConversationService] batch-deleting {} conversations",
            conversation_ids.len()
        );
        self.transport
            .execute(RequestSpec::post(path, body, self.timeouts.batch_delete))
            .await
    }

    async fn analytics(&self, user_id: &str, days_back: u32) -> Result<AnalyticsReport> {
        require("userId", user_id)?;

        let path = format!("/api/conversations/{user_id}/analytics?days_back={days_back}");
        self.transport
            .execute(RequestSpec::get(path, self.timeouts.analytics))
            .await
    }
}
