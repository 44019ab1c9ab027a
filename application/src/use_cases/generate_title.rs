//! Generate Title use case
//!
//! Asks a lightweight model for a short conversation title. Never fails:
//! any error or unusable reply falls back to [`UNTITLED`].

use crate::ports::model_query::ModelQueryService;
use council_domain::core::string::truncate_chars;
use council_domain::{Message, Model, PromptTemplate, Question, UNTITLED};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum title length in characters
pub const MAX_TITLE_CHARS: usize = 50;

/// Use case for titling a conversation from its first question
pub struct GenerateTitleUseCase {
    query_service: Arc<dyn ModelQueryService>,
    model: Model,
    timeout: Duration,
}

impl GenerateTitleUseCase {
    pub fn new(query_service: Arc<dyn ModelQueryService>, model: Model) -> Self {
        Self {
            query_service,
            model,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn execute(&self, question: &Question) -> String {
        let messages = vec![Message::user(PromptTemplate::title_prompt(
            question.content(),
        ))];

        match self
            .query_service
            .query_one(&self.model, &messages, Some(self.timeout))
            .await
        {
            Ok(reply) => {
                let title = clean_title(&reply);
                debug!("Generated title: {}", title);
                title
            }
            Err(e) => {
                warn!("Title generation with {} failed: {}", self.model, e);
                UNTITLED.to_string()
            }
        }
    }
}

/// Trim whitespace and surrounding quotes, then cap the length
fn clean_title(reply: &str) -> String {
    let title = reply.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    if title.is_empty() {
        return UNTITLED.to_string();
    }
    truncate_chars(title, MAX_TITLE_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_query::QueryError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedReply {
        reply: Result<String, QueryError>,
        seen: Mutex<Vec<(Model, Vec<Message>, Option<Duration>)>>,
    }

    impl FixedReply {
        fn new(reply: Result<String, QueryError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelQueryService for FixedReply {
        async fn query_one(
            &self,
            model: &Model,
            messages: &[Message],
            timeout: Option<Duration>,
        ) -> Result<String, QueryError> {
            self.seen
                .lock()
                .unwrap()
                .push((model.clone(), messages.to_vec(), timeout));
            self.reply.clone()
        }
    }

    fn question() -> Question {
        Question::new("How do I pick a database for a small web app?").unwrap()
    }

    #[tokio::test]
    async fn test_title_is_cleaned() {
        let service = FixedReply::new(Ok("  \"Picking A Small Database\"\n".to_string()));
        let use_case = GenerateTitleUseCase::new(service.clone(), Model::new("title/model"));

        assert_eq!(use_case.execute(&question()).await, "Picking A Small Database");

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen[0].0, Model::new("title/model"));
        assert_eq!(seen[0].2, Some(Duration::from_secs(30)));
        assert_eq!(seen[0].1.len(), 1);
        assert!(seen[0].1[0].content.contains("How do I pick a database"));
    }

    #[tokio::test]
    async fn test_long_title_is_capped() {
        let service = FixedReply::new(Ok("x".repeat(80)));
        let use_case = GenerateTitleUseCase::new(service, Model::new("title/model"));
        assert_eq!(use_case.execute(&question()).await.chars().count(), 50);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let service = FixedReply::new(Err(QueryError::Timeout));
        let use_case = GenerateTitleUseCase::new(service.clone(), Model::new("title/model"))
            .with_timeout(Duration::from_secs(5));

        assert_eq!(use_case.execute(&question()).await, UNTITLED);
        assert_eq!(service.seen.lock().unwrap()[0].2, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_blank_reply_falls_back() {
        assert_eq!(clean_title("  ''  "), UNTITLED);
        assert_eq!(clean_title("'Rust Basics'"), "Rust Basics");
    }
}
