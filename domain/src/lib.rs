//! Domain layer for llm-council
//!
//! This crate contains the core deliberation logic, entities, and value
//! objects. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! A council run has three stages:
//!
//! 1. **Responses**: every panel member answers the question independently.
//! 2. **Rankings**: every panel member critiques and ranks all answers,
//!    which are anonymized as `Response A`, `Response B`, ...
//! 3. **Synthesis**: the chairman writes one answer informed by the
//!    answers and the peer rankings.
//!
//! The pure parts of that pipeline live here: labeling ([`council::anonymize`]),
//! ranking extraction ([`council::parse_ranking`]), consensus
//! ([`council::aggregate_rankings`]) and prompt construction ([`PromptTemplate`]).

pub mod config;
pub mod conversation;
pub mod core;
pub mod council;
pub mod orchestration;
pub mod prompt;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use conversation::{
    context::build_conversation_context,
    entities::{Conversation, ConversationSummary, ConversationTurn, TurnRole, UNTITLED},
    message::{Message, Role},
    repository::{ConversationRepository, RepositoryError},
};
pub use core::{error::DomainError, model::Model, question::Question};
pub use council::{FINAL_RANKING_MARKER, Label, LabelMap, aggregate_rankings, anonymize, parse_ranking};
pub use orchestration::{
    entities::{CouncilConfig, Stage},
    value_objects::{
        AggregateEntry, CHAIRMAN_FAILURE_NOTICE, ChairmanResult, CouncilMetadata, CouncilResult,
        PanelAnswer, PeerRanking, TOTAL_FAILURE_IDENTITY, TOTAL_FAILURE_NOTICE,
    },
};
pub use prompt::PromptTemplate;
