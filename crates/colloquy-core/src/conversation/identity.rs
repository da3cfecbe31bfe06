//! Conversation identity lifecycle.
//!
//! A conversation's identifier moves through three states: `Unset` (no
//! identifier at all, the initial state for the context-based flow),
//! `Pending` (a send is in flight with no confirmed server identifier;
//! the list-managed flow carries a client-generated placeholder here),
//! and `Bound` (a successful response supplied a server identifier).
//! `Bound` is terminal for the session.

use crate::error::{ColloquyError, Result};
use serde::{Deserialize, Serialize};

/// State machine for a conversation's server-confirmed identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationIdentity {
    /// No identifier and no messages sent yet.
    Unset,
    /// A send is in flight without a confirmed server identifier. The
    /// payload is the client-generated placeholder, if the flow uses one.
    Pending(Option<String>),
    /// The server has confirmed this identifier. Terminal.
    Bound(String),
}

impl ConversationIdentity {
    /// Creates a pending identity carrying a client-generated placeholder.
    pub fn pending(placeholder: impl Into<String>) -> Self {
        Self::Pending(Some(placeholder.into()))
    }

    /// The identifier to put on the wire for the next request, if any.
    ///
    /// `Unset` and placeholder-less `Pending` send no identifier at all,
    /// deferring identity to the server.
    pub fn wire_id(&self) -> Option<&str> {
        match self {
            Self::Unset | Self::Pending(None) => None,
            Self::Pending(Some(id)) => Some(id),
            Self::Bound(id) => Some(id),
        }
    }

    /// Whether the server has confirmed an identifier.
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }

    /// Adopts a server-confirmed identifier.
    ///
    /// Binding an already-bound identity to the same value is a no-op;
    /// binding it to a different value is rejected, so an identifier can
    /// never silently change once confirmed.
    pub fn bind(&mut self, server_id: impl Into<String>) -> Result<()> {
        let server_id = server_id.into();
        match self {
            Self::Bound(existing) if *existing != server_id => Err(ColloquyError::identity(
                format!("conversation already bound to '{existing}', refusing rebind to '{server_id}'"),
            )),
            Self::Bound(_) => Ok(()),
            _ => {
                *self = Self::Bound(server_id);
                Ok(())
            }
        }
    }
}
