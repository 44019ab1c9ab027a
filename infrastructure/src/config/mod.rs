//! Configuration file loading for llm-council
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `LLM_COUNCIL_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./council.toml` or `./.council.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/llm-council/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileCouncilConfig, FileLoggingConfig, FileOpenRouterConfig, FileOutputConfig,
    FileReplConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
