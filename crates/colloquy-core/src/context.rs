//! Context-based send flow.
//!
//! A narrower alternative to [`ConversationManager`] that tracks a
//! single dialogue without a list view. The key difference is how the
//! conversation identity is established: this flow never generates a
//! client-side identifier. Sends go out with no conversation id until
//! the server returns one; from then on the returned identifier is
//! adopted and reused for every subsequent send in the session.
//!
//! [`ConversationManager`]: crate::manager::ConversationManager

use crate::backend::{ConversationBackend, Responder};
use crate::conversation::convert::{expand, filter_control_records};
use crate::conversation::identity::ConversationIdentity;
use crate::conversation::message::Message;
use crate::error::{ColloquyError, Result};
use chrono::Utc;
use std::sync::Arc;

/// A single active dialogue whose identity is assigned by the server.
pub struct ContextSession {
    backend: Arc<dyn ConversationBackend>,
    user_id: String,
    identity: ConversationIdentity,
    messages: Vec<Message>,
    error: Option<String>,
    filter_control: bool,
}

impl ContextSession {
    /// Creates a session with no identifier and an empty transcript.
    pub fn new(backend: Arc<dyn ConversationBackend>, user_id: impl Into<String>) -> Self {
        Self {
            backend,
            user_id: user_id.into(),
            identity: ConversationIdentity::Unset,
            messages: Vec::new(),
            error: None,
            filter_control: true,
        }
    }

    /// Enables or disables hiding of internal tooling records.
    pub fn with_control_filter(mut self, enabled: bool) -> Self {
        self.filter_control = enabled;
        self
    }

    /// Sends a user message, adopting the server-assigned identifier on
    /// the first successful reply.
    ///
    /// The user message is appended optimistically and is not rolled
    /// back on failure. A failed send while the identity is still unset
    /// leaves the session without a bound identifier; retry `send`
    /// rather than assuming one was created. A reply carrying a
    /// different identifier than the one already bound is rejected.
    pub async fn send(&mut self, text: &str, responder: &dyn Responder) -> Result<()> {
        if text.trim().is_empty() {
            return self.fail(ColloquyError::validation("message text must not be blank"));
        }

        self.messages.push(Message::user(text, Utc::now()));
        if self.identity == ConversationIdentity::Unset {
            // A send is now in flight; still no identifier on the wire.
            self.identity = ConversationIdentity::Pending(None);
        }

        let wire_id = self.identity.wire_id().map(str::to_string);
        let reply = match responder.respond(wire_id.as_deref(), text).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!("[ContextSession] responder failed: {err}");
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        if let Some(server_id) = &reply.conversation_id
            && let Err(err) = self.identity.bind(server_id)
        {
            tracing::warn!("[ContextSession] {err}");
            self.error = Some(err.to_string());
            return Err(err);
        }

        let Some(conversation_id) = self.identity.wire_id().map(str::to_string) else {
            return self.fail(ColloquyError::identity(
                "server did not assign a conversation identifier",
            ));
        };

        if reply.content.trim().is_empty() {
            return self.fail(ColloquyError::validation("assistant reply was empty"));
        }

        if let Err(err) = self
            .backend
            .append(&self.user_id, &conversation_id, text, &reply.content, None)
            .await
        {
            tracing::warn!("[ContextSession] append failed: {err}");
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.messages
            .push(Message::assistant(reply.content, Utc::now()));
        self.error = None;
        Ok(())
    }

    /// Replaces the transcript with server history.
    ///
    /// Only available once the identity is bound; records are filtered
    /// and expanded with the same semantics as the list-managed flow.
    pub async fn load_history(&mut self, limit: Option<u32>) -> Result<()> {
        let Some(conversation_id) = self.identity.wire_id().map(str::to_string) else {
            return self.fail(ColloquyError::validation(
                "no conversation identifier bound yet",
            ));
        };

        let records = match self
            .backend
            .get_history(&self.user_id, &conversation_id, limit)
            .await
        {
            Ok(records) => records,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        let records = filter_control_records(records, self.filter_control);
        self.messages = expand(&records);
        self.error = None;
        Ok(())
    }

    /// The transcript, ordered by timestamp ascending.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The server-assigned conversation identifier, once bound.
    pub fn conversation_id(&self) -> Option<&str> {
        match &self.identity {
            ConversationIdentity::Bound(id) => Some(id),
            _ => None,
        }
    }

    /// Whether the server has confirmed an identifier.
    pub fn is_bound(&self) -> bool {
        self.identity.is_bound()
    }

    /// The last surfaced error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn fail(&mut self, err: ColloquyError) -> Result<()> {
        self.error = Some(err.to_string());
        Err(err)
    }
}
