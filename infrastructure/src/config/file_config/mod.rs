//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and
//! application types once every issue has been reported.

mod council;
mod logging;
mod openrouter;
mod output;
mod repl;
mod storage;

pub use council::FileCouncilConfig;
pub use logging::FileLoggingConfig;
pub use openrouter::FileOpenRouterConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use storage::FileStorageConfig;

use council_application::ExecutionParams;
use council_domain::{ConfigIssue, CouncilConfig, Model};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Panel, chairman and title model
    pub council: FileCouncilConfig,
    /// OpenRouter connection settings
    pub openrouter: FileOpenRouterConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Conversation transcript settings
    pub logging: FileLoggingConfig,
    /// Saved conversation settings
    pub storage: FileStorageConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.council.parse_panel().1);
        issues.extend(self.council.parse_chairman().1);
        issues.extend(self.council.parse_title_model().1);
        issues.extend(self.openrouter.validate());
        issues
    }

    /// Council membership, falling back to the built-in defaults
    pub fn council_config(&self) -> CouncilConfig {
        let panel = self
            .council
            .parse_panel()
            .0
            .filter(|panel| !panel.is_empty())
            .unwrap_or_else(Model::default_panel);
        let chairman = self
            .council
            .parse_chairman()
            .0
            .unwrap_or_else(Model::default_chairman);
        CouncilConfig::new(panel, chairman)
    }

    pub fn title_model(&self) -> Model {
        self.council
            .parse_title_model()
            .0
            .unwrap_or_else(Model::default_title_model)
    }

    pub fn execution_params(&self) -> ExecutionParams {
        let params = ExecutionParams::default().with_title_timeout(self.openrouter.title_timeout());
        match self.openrouter.chairman_timeout() {
            Some(timeout) => params.with_chairman_timeout(timeout),
            None => params,
        }
    }
}

/// Expand a leading `~/` to the home directory
pub(crate) fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::OutputFormat;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[council]
models = ["openai/gpt-5.1", "x-ai/grok-4"]
chairman = "anthropic/claude-sonnet-4.5"

[openrouter]
timeout_seconds = 60
chairman_timeout_seconds = 240

[output]
format = "full"
color = false

[repl]
show_progress = false
history_file = "~/.local/share/llm-council/history.txt"

[logging]
conversation_log = true
keep_transcripts = 5

[storage]
enabled = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());

        let council = config.council_config();
        assert_eq!(
            council.panel().to_vec(),
            vec![Model::new("openai/gpt-5.1"), Model::new("x-ai/grok-4")]
        );
        assert_eq!(council.chairman, Model::new("anthropic/claude-sonnet-4.5"));
        assert_eq!(config.title_model(), Model::default_title_model());

        assert_eq!(config.openrouter.timeout_seconds, 60);
        assert_eq!(
            config.execution_params().chairman_timeout,
            Some(Duration::from_secs(240))
        );
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(!config.repl.show_progress);
        assert!(config.logging.conversation_log);
        assert_eq!(config.logging.keep_transcripts(), 5);
        assert!(!config.storage.enabled);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.council_config(), CouncilConfig::default());
        assert_eq!(config.execution_params(), ExecutionParams::default());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[council]
models = ["a/one", "", "a/one"]
chairman = " "

[openrouter]
title_timeout_seconds = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 4);
        assert_eq!(issues.iter().filter(|i| i.is_error()).count(), 3);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/x"), PathBuf::from("/tmp/x"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/notes"), home.join("notes"));
        }
    }
}
