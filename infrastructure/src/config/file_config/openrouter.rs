//! OpenRouter connection settings from TOML (`[openrouter]` section)

use council_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenRouter configuration from TOML
///
/// # Example
///
/// ```toml
/// [openrouter]
/// api_key_env = "OPENROUTER_API_KEY"
/// timeout_seconds = 120
/// chairman_timeout_seconds = 300
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenRouterConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    pub base_url: String,
    /// Default per-request timeout
    pub timeout_seconds: u64,
    /// Timeout override for the chairman call
    pub chairman_timeout_seconds: Option<u64>,
    pub title_timeout_seconds: u64,
    pub referer: Option<String>,
    pub app_title: Option<String>,
}

impl Default for FileOpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            base_url: crate::openrouter::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 120,
            chairman_timeout_seconds: None,
            title_timeout_seconds: 30,
            referer: None,
            app_title: Some("llm-council".to_string()),
        }
    }
}

impl FileOpenRouterConfig {
    /// The inline key if set, else the value of `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn chairman_timeout(&self) -> Option<Duration> {
        self.chairman_timeout_seconds.map(Duration::from_secs)
    }

    pub fn title_timeout(&self) -> Duration {
        Duration::from_secs(self.title_timeout_seconds)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let timeouts = [
            ("timeout_seconds", Some(self.timeout_seconds)),
            ("chairman_timeout_seconds", self.chairman_timeout_seconds),
            ("title_timeout_seconds", Some(self.title_timeout_seconds)),
        ];
        timeouts
            .into_iter()
            .filter(|(_, value)| *value == Some(0))
            .map(|(field, _)| {
                ConfigIssue::error(
                    ConfigIssueCode::InvalidTimeout {
                        field: field.to_string(),
                    },
                    format!("openrouter.{}: timeout must be at least 1 second", field),
                )
            })
            .collect()
    }
}
