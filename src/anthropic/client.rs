//! Messages API client.
//!
//! Transient failures (timeouts, 429, 5xx, overload) are retried with a
//! doubling backoff taken from [`ClientConfig::backoff`].

#![allow(clippy::missing_errors_doc)]

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::config::{ClientConfig, DEFAULT_MAX_TOKENS};
use super::types::{ApiErrorBody, ApiMessage, ApiRequest, ApiResponse};
use crate::error::AnthropicError;
use crate::traits::{
    AnthropicClientTrait, CompletionConfig, CompletionResponse, Message, Role, Usage,
};

/// Maximum number of messages per request.
pub const MAX_MESSAGES: usize = 8;
/// Maximum content length per message (120KB).
pub const MAX_CONTENT_LENGTH: usize = 120_000;

/// Status Anthropic uses for overload.
const STATUS_OVERLOADED: u16 = 529;

/// Anthropic API client.
#[derive(Debug)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    config: ClientConfig,
}

impl AnthropicClient {
    /// Create a new Anthropic client.
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, AnthropicError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AnthropicError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create a client with default configuration.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, AnthropicError> {
        Self::new(api_key, ClientConfig::default())
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request with retry logic.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AnthropicError> {
        Self::validate_request(&request)?;
        self.execute_with_retry(&request).await
    }

    fn validate_request(request: &ApiRequest) -> Result<(), AnthropicError> {
        if request.messages.is_empty() {
            return Err(AnthropicError::InvalidRequest {
                message: "At least one message is required".to_string(),
            });
        }

        if request.messages.len() > MAX_MESSAGES {
            return Err(AnthropicError::InvalidRequest {
                message: format!(
                    "Too many messages: {} > {MAX_MESSAGES}",
                    request.messages.len()
                ),
            });
        }

        if let Some(msg) = request
            .messages
            .iter()
            .find(|m| m.content.len() > MAX_CONTENT_LENGTH)
        {
            return Err(AnthropicError::InvalidRequest {
                message: format!(
                    "Message too large: {} > {MAX_CONTENT_LENGTH}",
                    msg.content.len()
                ),
            });
        }

        Ok(())
    }

    async fn execute_with_retry(&self, request: &ApiRequest) -> Result<ApiResponse, AnthropicError> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.config.backoff(attempt);
                tracing::warn!(attempt, delay_ms = delay.as_millis(), "Retrying Anthropic request");
                tokio::time::sleep(delay).await;
            }

            match self.execute_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(error = %e, attempt, "Retryable error occurred");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| AnthropicError::Network {
            message: "Unknown error after retries".to_string(),
        }))
    }

    async fn execute_once(&self, request: &ApiRequest) -> Result<ApiResponse, AnthropicError> {
        let url = format!("{}/messages", self.config.base_url);
        let start = Instant::now();

        tracing::debug!(
            url = %url,
            model = %request.model,
            max_tokens = request.max_tokens,
            timeout_ms = self.config.timeout_ms,
            "Starting Anthropic API request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let elapsed_ms = elapsed_ms(start);
                if e.is_timeout() {
                    tracing::error!(url = %url, elapsed_ms, "Anthropic API request timed out");
                    AnthropicError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else {
                    tracing::error!(url = %url, elapsed_ms, error = %e, "Anthropic API request failed");
                    AnthropicError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(
            status = %status,
            elapsed_ms = elapsed_ms(start),
            "Anthropic API response received"
        );

        match status {
            StatusCode::UNAUTHORIZED => return Err(AnthropicError::AuthenticationFailed),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                return Err(AnthropicError::RateLimited {
                    retry_after_seconds: retry_after,
                });
            }
            s if s.as_u16() == STATUS_OVERLOADED => {
                return Err(AnthropicError::ModelOverloaded {
                    model: request.model.clone(),
                });
            }
            s if s.is_server_error() => {
                return Err(AnthropicError::Network {
                    message: format!("Server error: {s}"),
                });
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .map_or(body, |b| format!("{}: {}", b.error.error_type, b.error.message));
                return Err(AnthropicError::InvalidRequest {
                    message: format!("Status {s}: {message}"),
                });
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| AnthropicError::UnexpectedResponse {
                message: format!("Failed to parse response: {e}"),
            })
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl AnthropicClientTrait for AnthropicClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, AnthropicError> {
        let api_messages = messages
            .into_iter()
            .map(|m| match m.role {
                Role::User => ApiMessage::user(m.content),
                Role::Assistant => ApiMessage::assistant(m.content),
            })
            .collect();

        let max_tokens = config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
        let mut request = ApiRequest::new(&self.config.model, max_tokens, api_messages);
        if let Some(temp) = config.temperature {
            request = request.with_temperature(f64::from(temp));
        }
        if let Some(system) = config.system_prompt {
            request = request.with_system(system);
        }

        let response = self.send(request).await?;
        let content = response.text();
        if content.trim().is_empty() {
            return Err(AnthropicError::UnexpectedResponse {
                message: "No text content in response".to_string(),
            });
        }

        let mut completion = CompletionResponse::new(
            content,
            Usage::new(response.usage.input_tokens, response.usage.output_tokens),
        );
        if let Some(reason) = response.stop_reason {
            completion = completion.with_stop_reason(reason);
        }
        Ok(completion)
    }
}

#[async_trait]
impl AnthropicClientTrait for Arc<AnthropicClient> {
    async fn complete(
        &self,
        messages: Vec<Message>,
        config: CompletionConfig,
    ) -> Result<CompletionResponse, AnthropicError> {
        <AnthropicClient as AnthropicClientTrait>::complete(self.as_ref(), messages, config).await
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::anthropic::DEFAULT_API_VERSION;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mock_client(server: &MockServer, max_retries: u32) -> AnthropicClient {
        let config = ClientConfig::default()
            .with_base_url(server.uri())
            .with_max_retries(max_retries)
            .with_retry_delay_ms(1)
            .with_timeout_ms(5_000);
        AnthropicClient::new("test-api-key", config).unwrap()
    }

    fn success_body(text: &str) -> serde_json::Value {
        json!({
            "id": "msg_123",
            "content": [{"type": "text", "text": text}],
            "model": "claude-sonnet-4-20250514",
            "usage": {"input_tokens": 10, "output_tokens": 20},
            "stop_reason": "end_turn"
        })
    }

    #[test]
    fn test_client_new() {
        let client = AnthropicClient::with_api_key("test-key").unwrap();
        assert_eq!(client.base_url(), "https://api.anthropic.com/v1");
    }

    #[tokio::test]
    async fn test_complete_success_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", DEFAULT_API_VERSION))
            .and(body_partial_json(json!({
                "model": "claude-sonnet-4-20250514",
                "system": "Return JSON"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("{\"ok\":true}")))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server, 0);
        let response = client
            .complete(
                vec![Message::user("Hello")],
                CompletionConfig::new().with_system_prompt("Return JSON"),
            )
            .await
            .unwrap();

        assert_eq!(response.content, "{\"ok\":true}");
        assert_eq!(response.usage.total(), 30);
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = mock_client(&server, 3);
        let err = client
            .complete(vec![Message::user("Hello")], CompletionConfig::new())
            .await
            .unwrap_err();
        assert_eq!(err, AnthropicError::AuthenticationFailed);
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = mock_client(&server, 0);
        let err = client
            .complete(vec![Message::user("Hello")], CompletionConfig::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AnthropicError::RateLimited {
                retry_after_seconds: 7
            }
        );
    }

    #[tokio::test]
    async fn test_overloaded_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529))
            .expect(3)
            .mount(&server)
            .await;

        let client = mock_client(&server, 2);
        let err = client
            .complete(vec![Message::user("Hello")], CompletionConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnthropicError::ModelOverloaded { .. }));
    }

    #[tokio::test]
    async fn test_bad_request_surfaces_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "type": "error",
                "error": {"type": "invalid_request_error", "message": "max_tokens too large"}
            })))
            .mount(&server)
            .await;

        let client = mock_client(&server, 2);
        let err = client
            .complete(vec![Message::user("Hello")], CompletionConfig::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("max_tokens too large"));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_text_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("   ")))
            .mount(&server)
            .await;

        let client = mock_client(&server, 0);
        let err = client
            .complete(vec![Message::user("Hello")], CompletionConfig::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnthropicError::UnexpectedResponse { .. }));
    }

    #[tokio::test]
    async fn test_validate_request_limits() {
        let server = MockServer::start().await;
        let client = mock_client(&server, 0);

        let err = client.send(ApiRequest::new("m", 10, vec![])).await.unwrap_err();
        assert!(matches!(err, AnthropicError::InvalidRequest { .. }));

        let too_many = (0..=MAX_MESSAGES).map(|i| ApiMessage::user(format!("m{i}"))).collect();
        let err = client.send(ApiRequest::new("m", 10, too_many)).await.unwrap_err();
        assert!(err.to_string().contains("Too many messages"));

        let large = vec![ApiMessage::user("x".repeat(MAX_CONTENT_LENGTH + 1))];
        let err = client.send(ApiRequest::new("m", 10, large)).await.unwrap_err();
        assert!(err.to_string().contains("Message too large"));
    }
}
