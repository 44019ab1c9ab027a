//! Conversation repository trait

use super::entities::{Conversation, ConversationSummary};
use async_trait::async_trait;
use thiserror::Error;

/// Errors from conversation persistence
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("Corrupt conversation {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Repository for stored conversations
///
/// The council itself is handed history, never a store. Delivery surfaces
/// use this trait to keep history between runs; implementations live in the
/// infrastructure layer.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Create or overwrite a conversation
    async fn save(&self, conversation: &Conversation) -> Result<(), RepositoryError>;

    /// Load a conversation by id
    async fn load(&self, id: &str) -> Result<Conversation, RepositoryError>;

    /// List stored conversations, newest first
    async fn list(&self) -> Result<Vec<ConversationSummary>, RepositoryError>;
}
