//! Colloquy client: HTTP infrastructure for the conversation
//! synchronization client.
//!
//! [`ConversationService`] implements the core crate's
//! [`ConversationBackend`] trait against the remote conversation store,
//! built on a [`Transport`] that provides per-operation timeouts,
//! bounded retry with backoff and error classification.
//!
//! [`ConversationService`]: service::ConversationService
//! [`ConversationBackend`]: colloquy_core::backend::ConversationBackend
//! [`Transport`]: transport::Transport

pub mod config;
pub mod service;
pub mod transport;
pub mod wire;

pub use config::{ClientConfig, TimeoutBudgets};
pub use service::ConversationService;
pub use transport::{BackoffPolicy, RequestSpec, Transport, retry_with_backoff};
