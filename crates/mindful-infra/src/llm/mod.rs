//! LLM provider implementations.
//!
//! Contains the concrete [`LlmProvider`] used by the chat relay and a
//! factory ([`create_provider`]) that picks it from configuration. Without
//! an API key the factory returns [`UnconfiguredProvider`], so the relay
//! still answers with its fallback text.

pub mod openai_compat;

use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;

use mindful_core::llm::box_provider::BoxLlmProvider;
use mindful_core::llm::provider::LlmProvider;
use mindful_types::config::LlmConfig;
use mindful_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use self::openai_compat::OpenAiCompatibleProvider;

/// Name reported by [`UnconfiguredProvider`].
pub const UNCONFIGURED_PROVIDER: &str = "unconfigured";

/// Create a [`BoxLlmProvider`] from the model settings and an optional key.
///
/// A blank key counts as missing. Whether a missing key deserves a warning
/// is up to the caller.
pub fn create_provider(
    config: &LlmConfig,
    api_key: Option<&str>,
) -> Result<BoxLlmProvider, LlmError> {
    let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) else {
        debug!("No model API key, using the unconfigured provider");
        return Ok(BoxLlmProvider::new(UnconfiguredProvider));
    };

    let provider = OpenAiCompatibleProvider::new(
        SecretString::from(key.to_string()),
        Duration::from_secs(config.timeout_secs),
    )?
    .with_base_url(config.base_url.clone());
    debug!(base_url = %provider.base_url(), model = %config.model, "Model provider configured");

    Ok(BoxLlmProvider::new(provider))
}

/// Placeholder provider that fails every call with [`LlmError::NotConfigured`].
pub struct UnconfiguredProvider;

impl LlmProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        UNCONFIGURED_PROVIDER
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindful_types::llm::{Message, MessageRole};

    fn make_request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "Hello".to_string(),
            }],
            system: None,
            max_tokens: 10,
            temperature: Some(0.0),
        }
    }

    #[tokio::test]
    async fn test_missing_key_yields_unconfigured() {
        let provider = create_provider(&LlmConfig::default(), None).unwrap();
        assert_eq!(provider.name(), UNCONFIGURED_PROVIDER);
        let err = provider.complete(&make_request()).await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured));
    }

    #[test]
    fn test_blank_key_yields_unconfigured() {
        let provider = create_provider(&LlmConfig::default(), Some("   ")).unwrap();
        assert_eq!(provider.name(), "unconfigured");
    }

    #[test]
    fn test_key_yields_http_provider() {
        let provider = create_provider(&LlmConfig::default(), Some("sk-test")).unwrap();
        assert_eq!(provider.name(), "openai-compatible");
    }
}
