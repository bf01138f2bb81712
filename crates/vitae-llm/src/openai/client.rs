// HTTP client for OpenAI-compatible chat-completions endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};

use crate::config::{EndpointConfig, DEFAULT_REQUEST_TIMEOUT};
use crate::error::{LlmError, Result};
use crate::openai::responses::{error_message, parse_completion};
use crate::traits::{ChatClient, ChatRequest, ChatResponse};

/// Chat-completions client (HTTP direct, no SDK)
///
/// Posts to the configured URL as-is, so any provider that speaks the
/// chat-completions dialect works (OpenAI, Zhipu GLM, local gateways).
pub struct OpenAICompatClient {
    http_client: reqwest::Client,
    url: String,
}

impl OpenAICompatClient {
    /// Create new client for an endpoint with the default request timeout
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &EndpointConfig, timeout: Duration) -> Result<Self> {
        if endpoint.url.trim().is_empty() {
            return Err(LlmError::Config("Endpoint URL is empty".to_string()));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", endpoint.api_key))
            .map_err(|_| LlmError::Config("Invalid API key format".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            url: endpoint.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build chat completion request payload
    fn build_chat_request(&self, request: &ChatRequest) -> Result<Value> {
        let mut body = Map::new();
        body.insert("model".to_string(), Value::from(request.model.as_str()));
        body.insert("messages".to_string(), serde_json::to_value(&request.messages)?);

        let options = &request.options;
        if let Some(max_tokens) = options.max_tokens {
            body.insert("max_tokens".to_string(), Value::from(max_tokens));
        }
        if let Some(temp) = options.temperature {
            body.insert("temperature".to_string(), Value::from(temp));
        }
        if let Some(thinking) = options.thinking {
            body.insert("thinking".to_string(), serde_json::to_value(thinking)?);
        }

        Ok(Value::Object(body))
    }
}

#[async_trait]
impl ChatClient for OpenAICompatClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(&request)?;

        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self.http_client.post(&self.url).json(&payload).send().await?;

        let status = response.status();

        if !status.is_success() {
            // An unreadable error body still reports the status
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), %message, "Completion API returned an error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed = parse_completion(&body);
        if parsed.is_err() {
            tracing::error!(body = %body, "Completion API returned an unexpected body");
        }
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ChatOptions, ThinkingMode};
    use crate::types::Message;

    fn client() -> OpenAICompatClient {
        OpenAICompatClient::new(&EndpointConfig::new("http://localhost/v1/chat", "key")).unwrap()
    }

    #[test]
    fn test_payload_includes_generation_options() {
        let request = ChatRequest::new("glm-4.7", vec![Message::human("Hi")]).with_options(
            ChatOptions::new()
                .max_tokens(65536)
                .temperature(1.0)
                .thinking(ThinkingMode::Enabled),
        );

        let payload = client().build_chat_request(&request).unwrap();
        assert_eq!(payload["model"], "glm-4.7");
        assert_eq!(payload["max_tokens"], 65536);
        assert_eq!(payload["temperature"], 1.0);
        assert_eq!(payload["thinking"]["type"], "enabled");
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "Hi");
    }

    #[test]
    fn test_payload_omits_unset_options() {
        let request = ChatRequest::new("m", vec![Message::system("s")]);
        let payload = client().build_chat_request(&request).unwrap();
        let obj = payload.as_object().unwrap();
        assert!(!obj.contains_key("max_tokens"));
        assert!(!obj.contains_key("temperature"));
        assert!(!obj.contains_key("thinking"));
    }

    #[test]
    fn test_rejects_unusable_credentials() {
        let bad_key = EndpointConfig::new("http://localhost/v1/chat", "line\nbreak");
        assert!(matches!(
            OpenAICompatClient::new(&bad_key),
            Err(LlmError::Config(_))
        ));

        let no_url = EndpointConfig::new("  ", "key");
        assert!(matches!(
            OpenAICompatClient::new(&no_url),
            Err(LlmError::Config(_))
        ));
    }
}
