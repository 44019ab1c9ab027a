//! Conversation persistence
//!
//! Provides [`JsonConversationStore`], which implements the
//! [`ConversationRepository`](council_domain::ConversationRepository) port
//! with one JSON file per conversation.

mod json_store;

pub use json_store::JsonConversationStore;
