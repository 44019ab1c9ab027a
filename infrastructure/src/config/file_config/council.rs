//! Council membership from TOML (`[council]` section)

use council_domain::{ConfigIssue, ConfigIssueCode, Label, Model};
use serde::{Deserialize, Serialize};

/// Council membership configuration from TOML
///
/// # Example
///
/// ```toml
/// [council]
/// models = ["openai/gpt-5.1", "anthropic/claude-sonnet-4.5", "x-ai/grok-4"]
/// chairman = "google/gemini-3-pro-preview"
/// title_model = "google/gemini-2.5-flash"
/// ```
///
/// Panel order is label order: the first model to answer gets `Response A`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Panel members, in label order
    pub models: Option<Vec<String>>,
    /// Stage 3 synthesizer
    pub chairman: Option<String>,
    /// Model used to title chat conversations
    pub title_model: Option<String>,
}

impl FileCouncilConfig {
    /// Parse a single model string, collecting issues for empty names.
    fn parse_single_model(
        field: &str,
        value: Option<&String>,
    ) -> (Option<Model>, Vec<ConfigIssue>) {
        match value {
            None => (None, Vec::new()),
            Some(s) if s.trim().is_empty() => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: field.to_string(),
                    },
                    format!("council.{}: model name cannot be empty", field),
                )],
            ),
            Some(s) => (Some(Model::new(s.trim())), Vec::new()),
        }
    }

    /// Parse the panel list.
    ///
    /// Empty names are reported and skipped, repeated members are reported
    /// and dropped (first occurrence wins), and a panel with more members
    /// than there are labels is an error.
    pub fn parse_panel(&self) -> (Option<Vec<Model>>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let Some(strings) = self.models.as_ref() else {
            return (None, issues);
        };

        let mut panel: Vec<Model> = Vec::with_capacity(strings.len());
        for s in strings {
            if s.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: "models".to_string(),
                    },
                    "council.models: model name cannot be empty in list",
                ));
                continue;
            }
            let model = Model::new(s.trim());
            if panel.contains(&model) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::DuplicatePanelMember {
                        model: model.to_string(),
                    },
                    format!("council.models: '{}' is listed more than once", model),
                ));
                continue;
            }
            panel.push(model);
        }

        if panel.len() > Label::MAX {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::PanelTooLarge {
                    size: panel.len(),
                    max: Label::MAX,
                },
                format!(
                    "council.models: {} members configured, at most {} are supported",
                    panel.len(),
                    Label::MAX
                ),
            ));
        }

        (Some(panel), issues)
    }

    pub fn parse_chairman(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("chairman", self.chairman.as_ref())
    }

    pub fn parse_title_model(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("title_model", self.title_model.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::Severity;

    #[test]
    fn test_parse_panel_keeps_order() {
        let config = FileCouncilConfig {
            models: Some(vec!["b/two".into(), "a/one".into()]),
            ..Default::default()
        };
        let (panel, issues) = config.parse_panel();
        assert!(issues.is_empty());
        assert_eq!(panel.unwrap(), vec![Model::new("b/two"), Model::new("a/one")]);
    }

    #[test]
    fn test_parse_panel_reports_empty_and_duplicates() {
        let config = FileCouncilConfig {
            models: Some(vec!["a/one".into(), "  ".into(), "a/one".into()]),
            ..Default::default()
        };
        let (panel, issues) = config.parse_panel();
        assert_eq!(panel.unwrap(), vec![Model::new("a/one")]);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[1].severity, Severity::Warning);
        assert!(matches!(
            issues[1].code,
            ConfigIssueCode::DuplicatePanelMember { .. }
        ));
    }

    #[test]
    fn test_parse_panel_too_large() {
        let config = FileCouncilConfig {
            models: Some((0..27).map(|i| format!("p/m{i}")).collect()),
            ..Default::default()
        };
        let (_, issues) = config.parse_panel();
        assert!(issues.iter().any(|i| i.is_error()
            && i.code == ConfigIssueCode::PanelTooLarge { size: 27, max: 26 }));
    }

    #[test]
    fn test_parse_empty_chairman() {
        let config = FileCouncilConfig {
            chairman: Some(String::new()),
            ..Default::default()
        };
        let (chairman, issues) = config.parse_chairman();
        assert!(chairman.is_none());
        assert!(issues[0].is_error());
    }
}
