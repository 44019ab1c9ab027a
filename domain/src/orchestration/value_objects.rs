//! Orchestration value objects - immutable result types for council runs.
//!
//! These types represent the outputs of each council stage:
//! - [`PanelAnswer`] - one panel member's Stage 1 answer
//! - [`PeerRanking`] - one panel member's Stage 2 critique and parsed ranking
//! - [`AggregateEntry`] - one identity's consensus position across all peers
//! - [`ChairmanResult`] - the Stage 3 synthesized answer (or a failure notice)
//! - [`CouncilResult`] - the complete bundle returned to the caller

use crate::core::model::Model;
use crate::council::label::{Label, LabelMap};
use serde::{Deserialize, Serialize};

/// Shown in place of the synthesis when the chairman call fails
pub const CHAIRMAN_FAILURE_NOTICE: &str = "Error: the chairman failed to synthesize a final answer. \
The individual responses and peer rankings are still available.";

/// Shown when no panel member answered in Stage 1
pub const TOTAL_FAILURE_NOTICE: &str = "All models failed to respond. \
Check your API key, credits and network connection, then try again.";

/// Identity reported for the synthetic total-failure result
pub const TOTAL_FAILURE_IDENTITY: &str = "error";

/// Stage 1 answer from a single panel member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelAnswer {
    pub model: Model,
    pub text: String,
}

impl PanelAnswer {
    pub fn new(model: Model, text: impl Into<String>) -> Self {
        Self {
            model,
            text: text.into(),
        }
    }
}

/// Stage 2 evaluation from a single panel member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRanking {
    /// The peer that produced the evaluation
    pub model: Model,
    /// Full critique text as returned by the peer
    pub raw_text: String,
    /// Labels extracted from the text, best first
    pub parsed_order: Vec<Label>,
}

impl PeerRanking {
    pub fn new(model: Model, raw_text: impl Into<String>, parsed_order: Vec<Label>) -> Self {
        Self {
            model,
            raw_text: raw_text.into(),
            parsed_order,
        }
    }

    /// Whether any label could be extracted
    pub fn has_ranking(&self) -> bool {
        !self.parsed_order.is_empty()
    }
}

/// One identity's position in the consensus ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub model: Model,
    /// Mean 1-based position across the peers that ranked this identity
    pub average_rank: f64,
    /// Number of peers whose ranking included this identity
    pub vote_count: usize,
}

/// Stage 3 result from the chairman
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChairmanResult {
    pub model: Model,
    pub text: String,
    /// `true` when `text` is a failure notice rather than a synthesis
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
}

impl ChairmanResult {
    pub fn success(model: Model, text: impl Into<String>) -> Self {
        Self {
            model,
            text: text.into(),
            failed: false,
        }
    }

    /// Chairman call failed; carries the fixed user-facing notice
    pub fn failure(model: Model) -> Self {
        Self {
            model,
            text: CHAIRMAN_FAILURE_NOTICE.to_string(),
            failed: true,
        }
    }

    /// Stand-in result when Stage 1 produced nothing
    pub fn total_failure() -> Self {
        Self {
            model: Model::new(TOTAL_FAILURE_IDENTITY),
            text: TOTAL_FAILURE_NOTICE.to_string(),
            failed: true,
        }
    }
}

/// Bookkeeping produced alongside the stage results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CouncilMetadata {
    pub label_map: LabelMap,
    pub aggregate_ranking: Vec<AggregateEntry>,
}

impl CouncilMetadata {
    pub fn is_empty(&self) -> bool {
        self.label_map.is_empty() && self.aggregate_ranking.is_empty()
    }
}

/// Complete result of one council run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilResult {
    /// Stage 1: surviving answers, in panel order
    pub stage1: Vec<PanelAnswer>,
    /// Stage 2: surviving peer evaluations, in panel order
    pub stage2: Vec<PeerRanking>,
    /// Stage 3: always present
    pub stage3: ChairmanResult,
    pub metadata: CouncilMetadata,
}

impl CouncilResult {
    pub fn new(
        stage1: Vec<PanelAnswer>,
        stage2: Vec<PeerRanking>,
        stage3: ChairmanResult,
        metadata: CouncilMetadata,
    ) -> Self {
        Self {
            stage1,
            stage2,
            stage3,
            metadata,
        }
    }

    /// Result for a run where every panel member failed Stage 1
    pub fn total_failure() -> Self {
        Self::new(
            Vec::new(),
            Vec::new(),
            ChairmanResult::total_failure(),
            CouncilMetadata::default(),
        )
    }

    pub fn is_total_failure(&self) -> bool {
        self.stage1.is_empty()
    }

    /// Identity behind an anonymous label of this run
    pub fn deanonymize(&self, label: Label) -> Option<&Model> {
        self.metadata.label_map.resolve(label)
    }
}
