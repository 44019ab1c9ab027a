//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "llm-council";
const PROJECT_FILES: [&str; 2] = ["council.toml", ".council.toml"];
const ENV_PREFIX: &str = "LLM_COUNCIL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`LLM_COUNCIL_OPENROUTER__TIMEOUT_SECONDS=60`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./council.toml` or `./.council.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/llm-council/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Build the merged provider chain without extracting it
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/llm-council/config.toml if set,
    /// otherwise falls back to ~/.config/llm-council/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config sources in priority order (for --show-config)
    pub fn describe_sources(config_path: Option<&PathBuf>) -> Vec<String> {
        fn line(label: &str, path: &Path) -> String {
            let found = if path.exists() { "FOUND" } else { "     " };
            format!("  [{}] {:<9} {}", found, label, path.display())
        }

        let mut lines = vec!["Configuration sources (in priority order):".to_string()];
        lines.push(format!("  [     ] Env:     {}<SECTION>__<KEY>", ENV_PREFIX));
        if let Some(path) = config_path {
            lines.push(line("Explicit:", path));
        }
        match Self::project_config_path() {
            Some(path) => lines.push(line("Project:", &path)),
            None => lines.push("  [     ] Project: ./council.toml or ./.council.toml".to_string()),
        }
        if let Some(path) = Self::global_config_path() {
            lines.push(line("Global:", &path));
        }
        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{Model, OutputFormat};
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.council.models.is_none());
        assert!(config.storage.enabled);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("llm-council"));
    }

    #[test]
    fn test_project_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "council.toml",
                r#"
[council]
models = ["a/one", "b/two"]

[output]
format = "full"
"#,
            )?;

            let config: FileConfig = ConfigLoader::figment(None).extract()?;
            assert_eq!(
                config.council_config().panel().to_vec(),
                vec![Model::new("a/one"), Model::new("b/two")]
            );
            assert_eq!(config.output.format, Some(OutputFormat::Full));
            assert_eq!(config.openrouter.timeout_seconds, 120);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file("council.toml", "[council]\nchairman = \"a/project\"\n")?;
            jail.create_file("custom.toml", "[council]\nchairman = \"b/explicit\"\n")?;

            let explicit = PathBuf::from("custom.toml");
            let config: FileConfig = ConfigLoader::figment(Some(&explicit)).extract()?;
            assert_eq!(config.council_config().chairman, Model::new("b/explicit"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file("council.toml", "[openrouter]\ntimeout_seconds = 60\n")?;
            jail.set_env("LLM_COUNCIL_OPENROUTER__TIMEOUT_SECONDS", "15");
            jail.set_env("LLM_COUNCIL_COUNCIL__CHAIRMAN", "c/env");

            let config: FileConfig = ConfigLoader::figment(None).extract()?;
            assert_eq!(config.openrouter.timeout_seconds, 15);
            assert_eq!(config.council_config().chairman, Model::new("c/env"));
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/council.toml");
        assert!(ConfigLoader::load(Some(&missing)).is_err());
    }
}
