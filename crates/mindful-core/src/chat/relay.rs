//! Chat relay: forwards one user message to the model API and records the
//! exchange.
//!
//! The relay never fails towards its caller. Model errors, timeouts and empty
//! replies turn into [`FALLBACK_REPLY`]; store errors are logged and the
//! reply is still returned. Flagged messages get [`CRISIS_NOTICE`] appended
//! and an open [`CrisisAlert`].
//!
//! Each call is stateless: only the system prompt and the current message
//! are sent, never earlier turns of the session.

use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, warn};
use uuid::Uuid;

use mindful_types::chat::{
    AlertStatus, ChatMessage, ChatReply, ChatRequest, CrisisAlert, MessageRole,
};
use mindful_types::config::LlmConfig;
use mindful_types::error::RepositoryError;
use mindful_types::llm::{CompletionRequest, Message};

use crate::chat::prompt::{FALLBACK_REPLY, SYSTEM_PROMPT};
use crate::chat::repository::ChatRepository;
use crate::crisis::{CRISIS_NOTICE, KeywordMatcher};
use crate::llm::box_provider::BoxLlmProvider;

/// Maximum number of messages returned by [`ChatRelay::history`].
pub const HISTORY_LIMIT: i64 = 1000;

/// Maximum number of alerts returned by [`ChatRelay::open_alerts`].
pub const ALERT_LIMIT: i64 = 100;

/// Model parameters for each relayed call.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl From<&LlmConfig> for RelaySettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Relays chat messages to the model and applies crisis detection.
///
/// Generic over `ChatRepository` to keep mindful-core free of infra types.
pub struct ChatRelay<C: ChatRepository> {
    chat_repo: C,
    provider: BoxLlmProvider,
    matcher: KeywordMatcher,
    settings: RelaySettings,
}

impl<C: ChatRepository> ChatRelay<C> {
    /// Create a relay using the built-in crisis phrases.
    pub fn new(chat_repo: C, provider: BoxLlmProvider, settings: RelaySettings) -> Self {
        Self {
            chat_repo,
            provider,
            matcher: KeywordMatcher::default(),
            settings,
        }
    }

    /// Replace the crisis matcher.
    pub fn with_matcher(mut self, matcher: KeywordMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Name of the provider replies come from.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Handle one chat message end to end. Always produces a reply.
    pub async fn relay(&self, request: &ChatRequest) -> ChatReply {
        let received_at = Utc::now();
        let is_crisis = self.matcher.matches(&request.message);

        let mut response = self.generate(&request.message).await;

        if is_crisis {
            response.push_str(CRISIS_NOTICE);
            self.log_crisis_alert(&request.session_id, &request.message)
                .await;
        }

        let user = ChatMessage {
            id: Uuid::now_v7(),
            session_id: request.session_id.clone(),
            role: MessageRole::User,
            content: request.message.clone(),
            timestamp: received_at,
            is_crisis,
        };
        let assistant = ChatMessage {
            id: Uuid::now_v7(),
            session_id: request.session_id.clone(),
            role: MessageRole::Assistant,
            content: response,
            timestamp: Utc::now(),
            is_crisis,
        };

        if let Err(e) = self.chat_repo.save_exchange(&user, &assistant).await {
            error!(
                session_id = %request.session_id,
                error = %e,
                "Failed to persist chat exchange"
            );
        }

        ChatReply {
            id: assistant.id,
            response: assistant.content,
            is_crisis,
            timestamp: assistant.timestamp,
        }
    }

    /// Messages of a session in insertion order.
    pub async fn history(&self, session_id: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.chat_repo
            .get_messages(session_id, Some(HISTORY_LIMIT))
            .await
    }

    /// Open crisis alerts, newest first.
    pub async fn open_alerts(&self) -> Result<Vec<CrisisAlert>, RepositoryError> {
        self.chat_repo
            .list_alerts(AlertStatus::Open, Some(ALERT_LIMIT))
            .await
    }

    /// Ask the model for a reply, substituting the fallback on any failure.
    async fn generate(&self, message: &str) -> String {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: message.to_string(),
            }],
            system: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: self.settings.max_tokens,
            temperature: None,
        };

        let start = Instant::now();
        let outcome =
            tokio::time::timeout(self.settings.timeout, self.provider.complete(&request)).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(Ok(reply)) if !reply.content.trim().is_empty() => {
                debug!(
                    provider = self.provider.name(),
                    model = %reply.model,
                    input_tokens = reply.usage.input_tokens,
                    output_tokens = reply.usage.output_tokens,
                    elapsed_ms,
                    "Model reply received"
                );
                reply.content
            }
            Ok(Ok(_)) => {
                warn!(
                    provider = self.provider.name(),
                    elapsed_ms,
                    "Model returned an empty reply, using fallback"
                );
                FALLBACK_REPLY.to_string()
            }
            Ok(Err(e)) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    elapsed_ms,
                    "Model call failed, using fallback"
                );
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                warn!(
                    provider = self.provider.name(),
                    timeout_secs = self.settings.timeout.as_secs(),
                    "Model call timed out, using fallback"
                );
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn log_crisis_alert(&self, session_id: &str, message: &str) {
        let alert = CrisisAlert::open(session_id, message);
        match self.chat_repo.save_alert(&alert).await {
            Ok(()) => {
                warn!(session_id = %session_id, alert_id = %alert.id, "Crisis alert logged");
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to persist crisis alert");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use mindful_types::llm::{CompletionResponse, LlmError, Usage};

    use super::*;
    use crate::llm::provider::LlmProvider;

    enum Behavior {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct FakeProvider {
        behavior: Behavior,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl FakeProvider {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl LlmProvider for FakeProvider {
        fn name(&self) -> &str {
            "fake"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            match self.behavior {
                Behavior::Reply(text) => Ok(CompletionResponse {
                    id: "cmpl-1".to_string(),
                    content: text.to_string(),
                    model: request.model.clone(),
                    usage: Usage::default(),
                }),
                Behavior::Fail => Err(LlmError::Provider {
                    message: "connection refused".to_string(),
                }),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(LlmError::Timeout(30))
                }
            }
        }
    }

    #[derive(Default)]
    struct MemoryChatRepo {
        messages: Mutex<Vec<ChatMessage>>,
        alerts: Mutex<Vec<CrisisAlert>>,
        broken: bool,
    }

    impl ChatRepository for MemoryChatRepo {
        async fn save_exchange(
            &self,
            user: &ChatMessage,
            assistant: &ChatMessage,
        ) -> Result<(), RepositoryError> {
            if self.broken {
                return Err(RepositoryError::Connection);
            }
            let mut messages = self.messages.lock().unwrap();
            messages.push(user.clone());
            messages.push(assistant.clone());
            Ok(())
        }

        async fn get_messages(
            &self,
            session_id: &str,
            limit: Option<i64>,
        ) -> Result<Vec<ChatMessage>, RepositoryError> {
            let messages = self.messages.lock().unwrap();
            Ok(messages
                .iter()
                .filter(|m| m.session_id == session_id)
                .take(limit.unwrap_or(i64::MAX) as usize)
                .cloned()
                .collect())
        }

        async fn save_alert(&self, alert: &CrisisAlert) -> Result<(), RepositoryError> {
            if self.broken {
                return Err(RepositoryError::Connection);
            }
            self.alerts.lock().unwrap().push(alert.clone());
            Ok(())
        }

        async fn list_alerts(
            &self,
            status: AlertStatus,
            _limit: Option<i64>,
        ) -> Result<Vec<CrisisAlert>, RepositoryError> {
            let alerts = self.alerts.lock().unwrap();
            Ok(alerts.iter().rev().filter(|a| a.status == status).cloned().collect())
        }
    }

    fn settings() -> RelaySettings {
        RelaySettings {
            model: "gpt-4o".to_string(),
            max_tokens: 256,
            timeout: Duration::from_millis(100),
        }
    }

    fn relay_with(behavior: Behavior) -> ChatRelay<MemoryChatRepo> {
        ChatRelay::new(
            MemoryChatRepo::default(),
            BoxLlmProvider::new(FakeProvider::new(behavior)),
            settings(),
        )
    }

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            session_id: "session-1".to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_relay_returns_model_reply() {
        let relay = relay_with(Behavior::Reply("That sounds stressful."));
        let reply = relay.relay(&request("Exams are coming up")).await;

        assert_eq!(reply.response, "That sounds stressful.");
        assert!(!reply.is_crisis);
        assert!(relay.open_alerts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_relay_sends_system_prompt_and_single_message() {
        let provider = FakeProvider::new(Behavior::Reply("ok"));
        let seen = Arc::clone(&provider.seen);
        let relay = ChatRelay::new(
            MemoryChatRepo::default(),
            BoxLlmProvider::new(provider),
            settings(),
        );

        relay.relay(&request("first")).await;
        relay.relay(&request("second")).await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        // Stateless: the second call carries only the second message.
        assert_eq!(seen[1].messages.len(), 1);
        assert_eq!(seen[1].messages[0].content, "second");
        assert_eq!(seen[1].messages[0].role, MessageRole::User);
        assert_eq!(seen[1].system.as_deref(), Some(SYSTEM_PROMPT));
        assert_eq!(seen[1].model, "gpt-4o");
        assert_eq!(seen[1].max_tokens, 256);
    }

    #[tokio::test]
    async fn test_crisis_message_appends_notice_and_logs_alert() {
        let relay = relay_with(Behavior::Reply("I'm here for you."));
        let reply = relay.relay(&request("I want to end my life")).await;

        assert!(reply.is_crisis);
        assert!(reply.response.starts_with("I'm here for you."));
        assert!(reply.response.ends_with(CRISIS_NOTICE));

        let alerts = relay.open_alerts().await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].session_id, "session-1");
        assert_eq!(alerts[0].message, "I want to end my life");
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let relay = relay_with(Behavior::Fail);
        let reply = relay.relay(&request("hello")).await;

        assert_eq!(reply.response, FALLBACK_REPLY);
        assert!(!reply.is_crisis);
    }

    #[tokio::test]
    async fn test_provider_timeout_falls_back() {
        let relay = relay_with(Behavior::Hang);
        let reply = relay.relay(&request("hello")).await;

        assert_eq!(reply.response, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_empty_model_reply_falls_back() {
        let relay = relay_with(Behavior::Reply("   "));
        let reply = relay.relay(&request("hello")).await;

        assert_eq!(reply.response, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_crisis_notice_survives_provider_failure() {
        let relay = relay_with(Behavior::Fail);
        let reply = relay.relay(&request("I keep thinking about suicide")).await;

        assert!(reply.is_crisis);
        assert!(reply.response.starts_with(FALLBACK_REPLY));
        assert!(reply.response.contains("988"));
    }

    #[tokio::test]
    async fn test_empty_message_passes_through() {
        let relay = relay_with(Behavior::Reply("Take your time."));
        let reply = relay.relay(&request("")).await;

        assert_eq!(reply.response, "Take your time.");
        assert!(!reply.is_crisis);
    }

    #[tokio::test]
    async fn test_store_failure_still_replies() {
        let repo = MemoryChatRepo {
            broken: true,
            ..Default::default()
        };
        let relay = ChatRelay::new(
            repo,
            BoxLlmProvider::new(FakeProvider::new(Behavior::Reply("still here"))),
            settings(),
        );
        let reply = relay.relay(&request("I want to die")).await;

        assert!(reply.is_crisis);
        assert!(reply.response.starts_with("still here"));
    }

    #[tokio::test]
    async fn test_history_keeps_insertion_order_and_roles() {
        let relay = relay_with(Behavior::Reply("reply"));
        relay.relay(&request("one")).await;
        relay.relay(&request("two")).await;

        let history = relay.history("session-1").await.unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "reply", "two", "reply"]);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[1].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_reply_id_matches_stored_assistant_message() {
        let relay = relay_with(Behavior::Reply("reply"));
        let reply = relay.relay(&request("hi")).await;

        let history = relay.history("session-1").await.unwrap();
        assert_eq!(history[1].id, reply.id);
        assert!(!history[0].is_crisis);
    }

    #[tokio::test]
    async fn test_custom_matcher() {
        let relay = relay_with(Behavior::Reply("ok"))
            .with_matcher(KeywordMatcher::new(["give up"]));
        assert!(relay.relay(&request("I want to give up")).await.is_crisis);
        assert!(!relay.relay(&request("suicide prevention week")).await.is_crisis);
    }

    #[test]
    fn test_settings_from_config() {
        let config = LlmConfig::default();
        let settings = RelaySettings::from(&config);
        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }
}
