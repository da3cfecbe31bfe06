//! Conversation domain types and pure conversions.

pub mod convert;
pub mod identity;
pub mod message;
pub mod model;
pub mod record;
pub mod summary;

pub use convert::{
    CONTROL_MARKER, NEW_CONVERSATION_TITLE, expand, filter_control_records, to_conversation_stub,
};
pub use identity::ConversationIdentity;
pub use message::Message;
pub use model::Conversation;
pub use record::BackendRecord;
pub use summary::ConversationSummary;
