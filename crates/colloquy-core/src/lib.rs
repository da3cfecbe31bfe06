//! Colloquy core: domain layer of the conversation synchronization
//! client.
//!
//! This crate holds everything that does not touch the network: the
//! data model, the error taxonomy, pure record/message conversions, the
//! conversation-identity state machine, the stateful
//! [`ConversationManager`] and the narrower [`ContextSession`] send
//! flow. The [`ConversationBackend`] trait is the seam implemented by
//! `colloquy-client` over HTTP and by mocks in tests.
//!
//! [`ConversationManager`]: manager::ConversationManager
//! [`ContextSession`]: context::ContextSession
//! [`ConversationBackend`]: backend::ConversationBackend

pub mod backend;
pub mod context;
pub mod conversation;
pub mod error;
pub mod manager;

#[cfg(test)]
mod manager_test;

// Re-export common error type
pub use error::{ColloquyError, Result};
