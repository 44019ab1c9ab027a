//! Execution parameters: per-call limits for the council use cases.
//!
//! [`ExecutionParams`] groups the static parameters that bound individual
//! model calls. These are application-layer concerns, not domain policy;
//! request timeouts for Stage 1 and Stage 2 belong to the query adapter.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call limits for council and title calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Timeout override for the single Stage 3 chairman call.
    pub chairman_timeout: Option<Duration>,
    /// Timeout for conversation title generation.
    pub title_timeout: Duration,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            chairman_timeout: None,
            title_timeout: Duration::from_secs(30),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_chairman_timeout(mut self, timeout: Duration) -> Self {
        self.chairman_timeout = Some(timeout);
        self
    }

    pub fn with_title_timeout(mut self, timeout: Duration) -> Self {
        self.title_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert!(params.chairman_timeout.is_none());
        assert_eq!(params.title_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_chairman_timeout(Duration::from_secs(300))
            .with_title_timeout(Duration::from_secs(5));
        assert_eq!(params.chairman_timeout, Some(Duration::from_secs(300)));
        assert_eq!(params.title_timeout, Duration::from_secs(5));
    }
}
