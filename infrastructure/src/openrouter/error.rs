//! Error types for the OpenRouter adapter

use council_application::QueryError;
use thiserror::Error;

/// Result type alias for OpenRouter operations
pub type Result<T> = std::result::Result<T, OpenRouterError>;

/// Errors that can occur when talking to OpenRouter
#[derive(Error, Debug)]
pub enum OpenRouterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("API error: {message}")]
    Api { code: Option<u16>, message: String },

    #[error("Response contained no choices")]
    NoChoices,

    #[error("Response content was empty")]
    EmptyContent,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<OpenRouterError> for QueryError {
    fn from(error: OpenRouterError) -> Self {
        match error {
            OpenRouterError::Http(e) if e.is_timeout() => QueryError::Timeout,
            OpenRouterError::Http(e) => QueryError::Transport(e.to_string()),
            OpenRouterError::ParseError { error, .. } => QueryError::InvalidResponse(error),
            OpenRouterError::Status { status, message } => QueryError::Api { status, message },
            OpenRouterError::Api { code, message } => QueryError::Api {
                status: code.unwrap_or(200),
                message,
            },
            OpenRouterError::NoChoices => {
                QueryError::InvalidResponse("response contained no choices".to_string())
            }
            OpenRouterError::EmptyContent => QueryError::EmptyResponse,
            OpenRouterError::Config(message) => QueryError::Configuration(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_api_error() {
        let error: QueryError = OpenRouterError::Status {
            status: 429,
            message: "rate limited".to_string(),
        }
        .into();
        assert_eq!(
            error,
            QueryError::Api {
                status: 429,
                message: "rate limited".to_string()
            }
        );
    }

    #[test]
    fn test_body_level_errors() {
        assert_eq!(
            QueryError::from(OpenRouterError::EmptyContent),
            QueryError::EmptyResponse
        );
        assert!(matches!(
            QueryError::from(OpenRouterError::NoChoices),
            QueryError::InvalidResponse(_)
        ));
        assert_eq!(
            QueryError::from(OpenRouterError::Api {
                code: None,
                message: "upstream failed".to_string()
            }),
            QueryError::Api {
                status: 200,
                message: "upstream failed".to_string()
            }
        );
    }
}
