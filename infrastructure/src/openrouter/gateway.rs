//! OpenRouter query service implementation

use super::DEFAULT_BASE_URL;
use super::error::{OpenRouterError, Result};
use super::protocol::{ChatRequest, ChatResponse, error_message};
use async_trait::async_trait;
use council_application::ports::model_query::{ModelQueryService, QueryError};
use council_domain::{Message, Model};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Connection settings for [`OpenRouterQueryService`]
#[derive(Debug, Clone)]
pub struct OpenRouterSettings {
    pub api_key: String,
    pub base_url: String,
    /// Default per-request timeout
    pub timeout: Duration,
    /// Sent as `HTTP-Referer` for OpenRouter attribution
    pub referer: Option<String>,
    /// Sent as `X-Title` for OpenRouter attribution
    pub app_title: Option<String>,
}

impl OpenRouterSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(120),
            referer: None,
            app_title: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn with_app_title(mut self, app_title: impl Into<String>) -> Self {
        self.app_title = Some(app_title.into());
        self
    }
}

/// Model query service backed by OpenRouter
///
/// Each call is an independent request; the client's connection pool is
/// shared, so concurrent fan-out reuses connections.
#[derive(Debug, Clone)]
pub struct OpenRouterQueryService {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterQueryService {
    pub fn new(settings: OpenRouterSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
            .map_err(|_| OpenRouterError::Config("Invalid API key format".to_string()))?;
        headers.insert(AUTHORIZATION, auth);

        if let Some(value) = settings
            .referer
            .as_deref()
            .and_then(|r| HeaderValue::from_str(r).ok())
        {
            headers.insert("HTTP-Referer", value);
        }
        if let Some(value) = settings
            .app_title
            .as_deref()
            .and_then(|t| HeaderValue::from_str(t).ok())
        {
            headers.insert("X-Title", value);
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| OpenRouterError::Config(format!("Failed to create HTTP client: {e}")))?;

        info!("OpenRouterQueryService initialized for {}", settings.base_url);

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn chat(
        &self,
        model: &Model,
        messages: &[Message],
        timeout: Option<Duration>,
    ) -> Result<String> {
        let body = ChatRequest::new(model.as_str(), messages);
        let mut request = self.client.post(self.chat_url()).json(&body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(
            "{} replied HTTP {} in {:?} ({} bytes)",
            model,
            status.as_u16(),
            start.elapsed(),
            text.len()
        );

        if !status.is_success() {
            return Err(OpenRouterError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        ChatResponse::parse(&text)?.into_content()
    }
}

#[async_trait]
impl ModelQueryService for OpenRouterQueryService {
    async fn query_one(
        &self,
        model: &Model,
        messages: &[Message],
        timeout: Option<Duration>,
    ) -> std::result::Result<String, QueryError> {
        self.chat(model, messages, timeout)
            .await
            .map_err(QueryError::from)
    }
}
