//! Conversation log configuration from TOML (`[logging]` section)

use super::expand_home;
use crate::logging::DEFAULT_KEEP_TRANSCRIPTS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write a JSONL transcript of every council run
    pub conversation_log: bool,
    /// Directory for transcripts
    pub log_dir: Option<String>,
    /// Number of transcripts kept before the oldest are removed
    pub keep_transcripts: Option<usize>,
}

impl FileLoggingConfig {
    /// Configured directory, or `<data_local_dir>/llm-council/logs`
    pub fn log_dir(&self) -> Option<PathBuf> {
        match &self.log_dir {
            Some(dir) => Some(expand_home(dir)),
            None => dirs::data_local_dir().map(|d| d.join("llm-council").join("logs")),
        }
    }

    pub fn keep_transcripts(&self) -> usize {
        self.keep_transcripts.unwrap_or(DEFAULT_KEEP_TRANSCRIPTS)
    }
}
