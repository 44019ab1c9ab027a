//! Conversation entities

use crate::orchestration::value_objects::{ChairmanResult, CouncilResult};
use serde::{Deserialize, Serialize};

/// Who produced a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One turn of conversation history supplied by the caller.
///
/// An assistant turn carries the chairman's synthesized answer. That answer
/// is the only thing replayed into later Stage 1 contexts; individual panel
/// answers never become conversation memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesized_answer: Option<ChairmanResult>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            synthesized_answer: None,
        }
    }

    /// Record the council's reply to the previous user turn.
    ///
    /// Failed syntheses are kept as display text only, so they are not
    /// replayed to the panel on the next question.
    pub fn assistant(result: &CouncilResult) -> Self {
        let synthesized_answer = (!result.stage3.failed).then(|| result.stage3.clone());
        Self {
            role: TurnRole::Assistant,
            content: result.stage3.text.clone(),
            synthesized_answer,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }
}

/// Default title until one is generated
pub const UNTITLED: &str = "New Conversation";

/// A persisted conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    pub title: String,
    #[serde(default)]
    pub turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new(id: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.into(),
            title: UNTITLED.to_string(),
            turns: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn has_title(&self) -> bool {
        self.title != UNTITLED
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Append a question and the council's reply
    pub fn record_exchange(&mut self, question: impl Into<String>, result: &CouncilResult) {
        self.turns.push(ConversationTurn::user(question));
        self.turns.push(ConversationTurn::assistant(result));
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            created_at: self.created_at.clone(),
            title: self.title.clone(),
            message_count: self.turns.len(),
        }
    }
}

/// Lightweight listing entry for stored conversations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub created_at: String,
    pub title: String,
    pub message_count: usize,
}
