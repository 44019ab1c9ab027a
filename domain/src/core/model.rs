//! Model value object representing a remote language-model endpoint

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of a queryable model endpoint (Value Object)
///
/// Identities are provider-qualified ids as understood by the model
/// router, e.g. `anthropic/claude-sonnet-4.5`. The council never
/// interprets them beyond [`Model::short_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Model(String);

impl Model {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the full identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without the provider prefix (`openai/gpt-5.1` -> `gpt-5.1`)
    pub fn short_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Provider prefix, if the identity is qualified
    pub fn provider(&self) -> Option<&str> {
        self.0.split_once('/').map(|(provider, _)| provider)
    }

    /// Default panel for a council discussion
    pub fn default_panel() -> Vec<Model> {
        vec![
            Model::new("openai/gpt-5.1"),
            Model::new("google/gemini-3-pro-preview"),
            Model::new("anthropic/claude-sonnet-4.5"),
            Model::new("x-ai/grok-4"),
        ]
    }

    /// Default chairman (Stage 3 synthesizer)
    pub fn default_chairman() -> Model {
        Model::new("google/gemini-3-pro-preview")
    }

    /// Default model for one-shot conversation titles
    pub fn default_title_model() -> Model {
        Model::new("google/gemini-2.5-flash")
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::new(s.trim()))
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        Model::new(s)
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_provider() {
        let model = Model::new("anthropic/claude-sonnet-4.5");
        assert_eq!(model.short_name(), "claude-sonnet-4.5");
        assert_eq!(model.provider(), Some("anthropic"));
    }

    #[test]
    fn test_short_name_unqualified() {
        let model = Model::new("local-llama");
        assert_eq!(model.short_name(), "local-llama");
        assert_eq!(model.provider(), None);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let model: Model = "  openai/gpt-5.1 ".parse().unwrap();
        assert_eq!(model.as_str(), "openai/gpt-5.1");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let model = Model::new("x-ai/grok-4");
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, "\"x-ai/grok-4\"");
        let back: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_default_panel_contains_chairman() {
        assert_eq!(Model::default_panel().len(), 4);
        assert!(Model::default_panel().contains(&Model::default_chairman()));
    }
}
