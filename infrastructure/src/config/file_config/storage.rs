//! Conversation storage configuration from TOML (`[storage]` section)

use super::expand_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw storage configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Save chat conversations after every turn
    pub enabled: bool,
    /// Root directory for saved conversations
    pub data_dir: Option<String>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            data_dir: None,
        }
    }
}

impl FileStorageConfig {
    /// Configured directory, or `<data_dir>/llm-council`
    pub fn data_dir(&self) -> Option<PathBuf> {
        match &self.data_dir {
            Some(dir) => Some(expand_home(dir)),
            None => dirs::data_dir().map(|d| d.join("llm-council")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_data_dir() {
        let config = FileStorageConfig {
            enabled: true,
            data_dir: Some("/var/lib/council".to_string()),
        };
        assert_eq!(config.data_dir(), Some(PathBuf::from("/var/lib/council")));
    }
}
