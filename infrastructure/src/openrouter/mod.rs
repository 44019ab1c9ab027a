//! OpenRouter adapter
//!
//! Implements the [`ModelQueryService`](council_application::ModelQueryService)
//! port over OpenRouter's OpenAI-compatible chat completions API.
//!
//! ```text
//! OpenRouterQueryService
//!   └── POST {base_url}/chat/completions   (one request per model call)
//! ```

pub mod error;
pub mod gateway;
pub mod protocol;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
