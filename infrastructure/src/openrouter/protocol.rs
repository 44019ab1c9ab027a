//! Wire types for the chat completions API

use super::error::{OpenRouterError, Result};
use council_domain::Message;
use serde::{Deserialize, Serialize};

/// Request body for `POST /chat/completions`
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ApiMessage<'a>>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, messages: &'a [Message]) -> Self {
        Self {
            model,
            messages: messages.iter().map(ApiMessage::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> From<&'a Message> for ApiMessage<'a> {
    fn from(message: &'a Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: &message.content,
        }
    }
}

/// Response body; OpenRouter may report errors inside a 200 response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: Option<String>,
    pub code: Option<serde_json::Value>,
}

impl ApiError {
    fn into_error(self) -> OpenRouterError {
        let code = self
            .code
            .as_ref()
            .and_then(serde_json::Value::as_u64)
            .and_then(|c| u16::try_from(c).ok());
        OpenRouterError::Api {
            code,
            message: self.message.unwrap_or_else(|| "unknown error".to_string()),
        }
    }
}

impl ChatResponse {
    /// Parse a raw response body
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| OpenRouterError::ParseError {
            error: e.to_string(),
            raw: body.to_string(),
        })
    }

    /// Content of the first choice
    pub fn into_content(self) -> Result<String> {
        if let Some(error) = self.error {
            return Err(error.into_error());
        }

        let choice = self
            .choices
            .and_then(|choices| choices.into_iter().next())
            .ok_or(OpenRouterError::NoChoices)?;

        match choice.message.and_then(|m| m.content) {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(OpenRouterError::EmptyContent),
        }
    }
}

/// Best-effort error message from a non-2xx body
pub fn error_message(body: &str) -> String {
    ChatResponse::parse(body)
        .ok()
        .and_then(|response| response.error)
        .and_then(|error| error.message)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let messages = vec![Message::system("be brief"), Message::user("hi")];
        let request = ChatRequest::new("openai/gpt-5.1", &messages);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "openai/gpt-5.1");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_first_choice_content() {
        let response = ChatResponse::parse(
            r#"{"choices":[{"message":{"content":"first"}},{"message":{"content":"second"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_content().unwrap(), "first");
    }

    #[test]
    fn test_error_in_success_body() {
        let response =
            ChatResponse::parse(r#"{"error":{"message":"model overloaded","code":502}}"#).unwrap();
        match response.into_content() {
            Err(OpenRouterError::Api { code, message }) => {
                assert_eq!(code, Some(502));
                assert_eq!(message, "model overloaded");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_and_empty_content() {
        let response = ChatResponse::parse(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            response.into_content(),
            Err(OpenRouterError::NoChoices)
        ));

        let response = ChatResponse::parse(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(
            response.into_content(),
            Err(OpenRouterError::EmptyContent)
        ));
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(
            error_message(r#"{"error":{"message":"No auth credentials found"}}"#),
            "No auth credentials found"
        );
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }
}
