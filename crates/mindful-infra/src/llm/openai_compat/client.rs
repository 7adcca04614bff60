//! OpenAiCompatibleProvider -- [`LlmProvider`] for chat completions APIs.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use mindful_core::llm::provider::LlmProvider;
use mindful_types::llm::{CompletionRequest, CompletionResponse, LlmError, MessageRole, Usage};

use super::types::{ChatCompletionMessage, ChatCompletionRequest, ChatCompletionResponse};

/// Provider for any OpenAI-compatible chat completions endpoint.
///
/// Does not derive Debug, so the key cannot leak through `{:?}`.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    timeout: Duration,
}

impl OpenAiCompatibleProvider {
    /// Default public endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    /// Create a provider against [`Self::DEFAULT_BASE_URL`].
    ///
    /// `timeout` bounds each HTTP request end to end.
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout,
        })
    }

    /// Override the base URL (gateways, proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a transport failure, keeping client timeouts distinct.
    fn transport_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout.as_secs())
        } else {
            LlmError::Provider {
                message: format!("HTTP request failed: {err}"),
            }
        }
    }

    /// Convert a generic [`CompletionRequest`]; the system prompt becomes
    /// the leading `system` message.
    fn to_wire_request(request: &CompletionRequest) -> ChatCompletionRequest {
        let system = request.system.as_ref().map(|s| ChatCompletionMessage {
            role: MessageRole::System.to_string(),
            content: Some(s.clone()),
        });

        let messages = system
            .into_iter()
            .chain(request.messages.iter().map(|m| ChatCompletionMessage {
                role: m.role.to_string(),
                content: Some(m.content.clone()),
            }))
            .collect();

        ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_wire_request(request);
        let url = self.url("/chat/completions");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let wire: ChatCompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                LlmError::Deserialization(format!("failed to parse response: {e}"))
            }
        })?;

        let content = wire
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let usage = wire.usage.unwrap_or_default();

        Ok(CompletionResponse {
            id: wire.id,
            content,
            model: wire.model,
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}
