//! Client-side conversation state manager.
//!
//! `ConversationManager` owns the in-memory conversation list and the
//! current-conversation pointer. It performs optimistic local mutation
//! before a network round-trip completes and reconciles on
//! success/failure. No other component holds a writable reference to
//! this state.
//!
//! Every operation that awaits the backend re-validates its assumptions
//! after resuming: the conversation it targeted is looked up by id again
//! before any mutation, because the list may have changed while the
//! request was in flight.

use crate::backend::{ConversationBackend, Responder};
use crate::conversation::convert::{
    NEW_CONVERSATION_TITLE, expand, filter_control_records, to_conversation_stub,
};
use crate::conversation::message::Message;
use crate::conversation::model::Conversation;
use crate::error::{ColloquyError, Result};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Orchestrates backend calls from UI intent and holds the
/// authoritative client-side conversation state.
pub struct ConversationManager {
    backend: Arc<dyn ConversationBackend>,
    user_id: Option<String>,
    conversations: Vec<Conversation>,
    current_id: Option<String>,
    loading: bool,
    error: Option<String>,
    filter_control: bool,
}

impl ConversationManager {
    /// Creates a manager with no user and an empty conversation list.
    ///
    /// Control-record filtering is enabled by default.
    pub fn new(backend: Arc<dyn ConversationBackend>) -> Self {
        Self {
            backend,
            user_id: None,
            conversations: Vec::new(),
            current_id: None,
            loading: false,
            error: None,
            filter_control: true,
        }
    }

    /// Enables or disables hiding of internal tooling records.
    pub fn with_control_filter(mut self, enabled: bool) -> Self {
        self.filter_control = enabled;
        self
    }

    /// Sets the active user identity and refreshes the list for it.
    ///
    /// A failed refresh surfaces as `error` and leaves the previous list
    /// intact.
    pub async fn set_user(&mut self, user_id: impl Into<String>) -> Result<()> {
        self.user_id = Some(user_id.into());
        self.refresh().await
    }

    /// Synthesizes a fresh conversation with a client-generated
    /// identifier, sets it as current and prepends it to the list.
    ///
    /// No network call is made; the identifier stays unbound until the
    /// first successful append. Clears any prior error.
    pub fn create_new(&mut self) -> &Conversation {
        let conversation =
            Conversation::empty(Uuid::new_v4().to_string(), NEW_CONVERSATION_TITLE);
        self.current_id = Some(conversation.id.clone());
        self.error = None;
        self.conversations.insert(0, conversation);
        &self.conversations[0]
    }

    /// Selects a conversation, hydrating its transcript if needed.
    ///
    /// Load failures surface as `error` without discarding the
    /// previously selected conversation.
    pub async fn select(&mut self, conversation_id: &str) -> Result<()> {
        let conversation = self
            .find(conversation_id)
            .ok_or_else(|| ColloquyError::validation(format!(
                "unknown conversation '{conversation_id}'"
            )))?;

        if !conversation.needs_hydration() {
            self.current_id = Some(conversation_id.to_string());
            return Ok(());
        }

        let user_id = self.require_user()?;

        self.loading = true;
        let fetched = self
            .backend
            .get_history(&user_id, conversation_id, None)
            .await;
        self.loading = false;

        let records = match fetched {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!("[ConversationManager] history load failed: {err}");
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        let records = filter_control_records(records, self.filter_control);
        let messages = expand(&records);

        // The list may have changed while the request was in flight.
        let Some(conversation) = self.find_mut(conversation_id) else {
            let err = ColloquyError::validation(format!(
                "conversation '{conversation_id}' disappeared during load"
            ));
            self.error = Some(err.to_string());
            return Err(err);
        };

        conversation.message_count = Some(records.len() as u32);
        if let Some(last) = messages.last() {
            conversation.timestamp = last.timestamp;
            conversation.last_message = last.content.clone();
        }
        conversation.messages = messages;
        self.current_id = Some(conversation_id.to_string());
        Ok(())
    }

    /// Sends a user message on the current conversation.
    ///
    /// The user message is appended optimistically before the network
    /// round-trip. On success the assistant reply is appended and the
    /// pair is durably stored; on failure the error is surfaced but the
    /// optimistic user message stays in place, so the transcript still
    /// shows that a message was sent.
    pub async fn send(&mut self, text: &str, responder: &dyn Responder) -> Result<()> {
        let user_id = self.require_user()?;
        if text.trim().is_empty() {
            return self.fail(ColloquyError::validation("message text must not be blank"));
        }
        let Some(conversation_id) = self.current_id.clone() else {
            return self.fail(ColloquyError::validation("no conversation is selected"));
        };

        // Optimistic append; not rolled back on failure.
        let Some(conversation) = self.find_mut(&conversation_id) else {
            return self.fail(ColloquyError::validation(format!(
                "current conversation '{conversation_id}' is not in the list"
            )));
        };
        conversation.push_message(Message::user(text, Utc::now()));

        let reply = match responder.respond(Some(&conversation_id), text).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!("[ConversationManager] responder failed: {err}");
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        // A blank reply is never stored as a successful exchange.
        if reply.content.trim().is_empty() {
            return self.fail(ColloquyError::validation("assistant reply was empty"));
        }

        if let Err(err) = self
            .backend
            .append(&user_id, &conversation_id, text, &reply.content, None)
            .await
        {
            tracing::warn!("[ConversationManager] append failed: {err}");
            self.error = Some(err.to_string());
            return Err(err);
        }

        // Re-validate: the conversation may have been removed meanwhile.
        if let Some(conversation) = self.find_mut(&conversation_id) {
            conversation.push_message(Message::assistant(reply.content, Utc::now()));
            // One more record is now stored server-side.
            conversation.message_count = Some(conversation.message_count.unwrap_or(0) + 1);
        }
        self.error = None;
        Ok(())
    }

    /// Deletes a conversation from the store and drops it from the list.
    ///
    /// Clears the current pointer if it referenced the deleted
    /// conversation.
    pub async fn remove(&mut self, conversation_id: &str) -> Result<()> {
        let user_id = self.require_user()?;

        if let Err(err) = self.backend.remove(&user_id, conversation_id).await {
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.conversations.retain(|c| c.id != conversation_id);
        if self.current_id.as_deref() == Some(conversation_id) {
            self.current_id = None;
        }
        Ok(())
    }

    /// Replaces the list with fresh stubs from the store.
    ///
    /// Summaries without an identifier are dropped; the result is sorted
    /// by most recent activity first. A failure leaves the previous list
    /// intact.
    pub async fn refresh(&mut self) -> Result<()> {
        let user_id = self.require_user()?;

        self.loading = true;
        let fetched = self
            .backend
            .list_summaries(&user_id, None, !self.filter_control)
            .await;
        self.loading = false;

        let summaries = match fetched {
            Err(err) => {
                tracing::warn!("[ConversationManager] refresh failed: {err}");
                self.error = Some(err.to_string());
                return Err(err);
            }
            Ok(summaries) => summaries,
        };

        let mut conversations: Vec<Conversation> = summaries
            .iter()
            .filter_map(to_conversation_stub)
            .collect();
        conversations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        self.conversations = conversations;
        if let Some(current) = self.current_id.clone() {
            if !self.conversations.iter().any(|c| c.id == current) {
                self.current_id = None;
            }
        }
        self.error = None;
        Ok(())
    }

    /// The conversation list, most recent first.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// The currently selected conversation, if any.
    pub fn current(&self) -> Option<&Conversation> {
        let id = self.current_id.as_deref()?;
        self.conversations.iter().find(|c| c.id == id)
    }

    /// The last surfaced error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a backend call is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn find(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == conversation_id)
    }

    fn find_mut(&mut self, conversation_id: &str) -> Option<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
    }

    fn require_user(&mut self) -> Result<String> {
        match &self.user_id {
            Some(user_id) => Ok(user_id.clone()),
            None => {
                let err = ColloquyError::validation("no authenticated user identity");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn fail(&mut self, err: ColloquyError) -> Result<()> {
        self.error = Some(err.to_string());
        Err(err)
    }
}
