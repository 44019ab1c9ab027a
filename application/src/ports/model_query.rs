//! Model query port
//!
//! Defines the interface for sending chat messages to remote model endpoints.

use async_trait::async_trait;
use council_domain::{Message, Model};
use futures::future::join_all;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while querying a single model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Request timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty response")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Settled result of one model call within a fan-out round
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub model: Model,
    pub result: Result<String, QueryError>,
}

impl QueryOutcome {
    pub fn new(model: Model, result: Result<String, QueryError>) -> Self {
        Self { model, result }
    }

    /// The reply text, treating blank content as a failure
    pub fn into_text(self) -> (Model, Result<String, QueryError>) {
        let result = match self.result {
            Ok(text) if text.trim().is_empty() => Err(QueryError::EmptyResponse),
            other => other,
        };
        (self.model, result)
    }
}

/// Service for querying model endpoints
///
/// This port defines how the council talks to language models.
/// Implementations (adapters) live in the infrastructure layer and own
/// authentication, timeouts and any retry policy.
#[async_trait]
pub trait ModelQueryService: Send + Sync {
    /// Send `messages` to one model and wait for its reply.
    ///
    /// `timeout` overrides the adapter's default request timeout.
    async fn query_one(
        &self,
        model: &Model,
        messages: &[Message],
        timeout: Option<Duration>,
    ) -> Result<String, QueryError>;

    /// Send the same `messages` to every model concurrently.
    ///
    /// Returns once every call has settled, one outcome per model, in the
    /// order the models were given. Dropping the returned future drops all
    /// in-flight calls.
    async fn query_many(&self, models: &[Model], messages: &[Message]) -> Vec<QueryOutcome> {
        let calls = models.iter().map(|model| async move {
            let result = self.query_one(model, messages, None).await;
            QueryOutcome::new(model.clone(), result)
        });
        join_all(calls).await
    }
}
