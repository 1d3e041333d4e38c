use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TEMPERATURE: f64 = 0.2;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Opaque, possibly-failing call from (context, question) to answer text.
/// Network errors, quota errors and timeouts all collapse into a single
/// `AppError::AnswerService`. Callers surface the message, nothing more.
#[async_trait::async_trait]
pub trait AnswerService: Send + Sync {
    async fn answer(&self, context: &str, question: &str) -> AppResult<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    config: AnswerConfig,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, config: AnswerConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::AnswerService(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { config, api_key: api_key.into(), client })
    }

    /// Read the API key from `ANTHROPIC_API_KEY`.
    pub fn from_env(config: AnswerConfig) -> AppResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AppError::AnswerService(format!("{API_KEY_ENV} is not set")))?;
        Self::new(api_key, config)
    }

    fn build_request(&self, context: &str, question: &str) -> MessagesRequest<'_> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![RequestMessage {
                role: "user",
                content: format!("{context}\n\nQuestion: {question}"),
            }],
        }
    }
}

#[async_trait::async_trait]
impl AnswerService for AnthropicClient {
    async fn answer(&self, context: &str, question: &str) -> AppResult<String> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let body = self.build_request(context, question);

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AppError::AnswerService(format!(
                "Model request failed with status {status}: {detail}"
            )));
        }

        let parsed: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| AppError::AnswerService(format!("Malformed model response: {e}")))?;

        let text = parsed
            .content
            .first()
            .map(|block| block.text.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(AppError::AnswerService("Model returned no text content".into()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnswerConfig::default();
        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.max_tokens, 1024);
        assert!((config.temperature - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_prompt_layout() {
        let client = AnthropicClient::new("test-key", AnswerConfig::default()).unwrap();
        let req = client.build_request("some chunk text", "what is this?");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, "user");
        assert_eq!(req.messages[0].content, "some chunk text\n\nQuestion: what is this?");
    }

    #[test]
    fn test_request_serializes_expected_fields() {
        let client = AnthropicClient::new("test-key", AnswerConfig::default()).unwrap();
        let req = client.build_request("ctx", "q");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "claude-3-haiku-20240307");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"content":[{"type":"text","text":"  the answer  "}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.content[0].text.trim(), "the answer");
    }
}
