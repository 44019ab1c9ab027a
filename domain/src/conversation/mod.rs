//! Conversation domain.
//!
//! - [`message::Message`]: one chat message sent to a model endpoint
//! - [`entities::ConversationTurn`]: one turn of caller-owned history
//! - [`entities::Conversation`]: a titled, persisted sequence of turns
//! - [`context::build_conversation_context`]: the Stage 1 message context
//! - [`repository::ConversationRepository`]: trait for conversation persistence

pub mod context;
pub mod entities;
pub mod message;
pub mod repository;
