//! Orchestration domain entities

use crate::core::error::DomainError;
use crate::core::model::Model;
use crate::council::label::Label;
use serde::{Deserialize, Serialize};

/// Stage of a council run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Every panel member answers independently
    Responses,
    /// Every panel member ranks the anonymized answers
    Rankings,
    /// The chairman synthesizes the final answer
    Synthesis,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Responses => "responses",
            Stage::Rankings => "rankings",
            Stage::Synthesis => "synthesis",
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Stage::Responses => 1,
            Stage::Rankings => 2,
            Stage::Synthesis => 3,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::Responses => "Individual Responses",
            Stage::Rankings => "Peer Rankings",
            Stage::Synthesis => "Final Synthesis",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {}: {}", self.number(), self.display_name())
    }
}

/// Who sits on the council (Entity)
///
/// Panel order matters: it is the order in which Stage 1 survivors are
/// labeled, and the final tie-break of the aggregate ranking.
///
/// The panel never holds the same model twice: a repeated member would
/// answer once but be owed two labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CouncilConfigFields")]
pub struct CouncilConfig {
    panel: Vec<Model>,
    /// Stage 3 synthesizer; need not be a panel member
    pub chairman: Model,
}

#[derive(Deserialize)]
struct CouncilConfigFields {
    panel: Vec<Model>,
    chairman: Model,
}

impl From<CouncilConfigFields> for CouncilConfig {
    fn from(fields: CouncilConfigFields) -> Self {
        CouncilConfig::new(fields.panel, fields.chairman)
    }
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            panel: Model::default_panel(),
            chairman: Model::default_chairman(),
        }
    }
}

impl CouncilConfig {
    /// Build a config, dropping repeated panel members (first one wins)
    pub fn new(panel: Vec<Model>, chairman: Model) -> Self {
        let mut unique: Vec<Model> = Vec::with_capacity(panel.len());
        for model in panel {
            if !unique.contains(&model) {
                unique.push(model);
            }
        }
        Self {
            panel: unique,
            chairman,
        }
    }

    /// Panel members, in configuration order
    pub fn panel(&self) -> &[Model] {
        &self.panel
    }

    pub fn with_chairman(mut self, chairman: Model) -> Self {
        self.chairman = chairman;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.panel.is_empty() {
            return Err(DomainError::NoModels);
        }
        if self.panel.len() > Label::MAX {
            return Err(DomainError::PanelTooLarge(self.panel.len()));
        }
        Ok(())
    }
}
