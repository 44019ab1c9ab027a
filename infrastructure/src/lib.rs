//! Infrastructure layer for llm-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application and domain layers, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openrouter;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileCouncilConfig, FileLoggingConfig, FileOpenRouterConfig,
    FileOutputConfig, FileReplConfig, FileStorageConfig,
};
pub use logging::JsonlTranscriptLogger;
pub use openrouter::{
    error::OpenRouterError,
    gateway::{OpenRouterQueryService, OpenRouterSettings},
};
pub use storage::JsonConversationStore;
