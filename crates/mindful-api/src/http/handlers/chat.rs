//! Chat relay HTTP handlers.
//!
//! Endpoints:
//! - POST /api/chat                      - Relay one message, with crisis check
//! - GET  /api/chat/history/{session_id} - Messages of a session, oldest first

use axum::extract::{Path, State};
use axum::Json;

use mindful_types::chat::{ChatMessage, ChatReply, ChatRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /api/chat - Relay a message to the model.
///
/// Always answers 200: model failures become the fallback reply and store
/// failures are only logged.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatReply> {
    Json(state.chat_relay.relay(&request).await)
}

/// GET /api/chat/history/{session_id} - Stored messages of a session.
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let messages = state.chat_relay.history(&session_id).await?;
    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use mindful_core::chat::prompt::FALLBACK_REPLY;
    use mindful_core::crisis::CRISIS_NOTICE;
    use mindful_types::llm::MessageRole;

    fn chat(session_id: &str, message: &str) -> Json<ChatRequest> {
        Json(ChatRequest {
            session_id: session_id.to_string(),
            message: message.to_string(),
        })
    }

    #[tokio::test]
    async fn test_unreachable_model_still_replies() {
        let state = test_state().await;
        let Json(reply) = send_message(State(state), chat("s-1", "I feel stressed about exams")).await;

        assert!(!reply.response.is_empty());
        assert_eq!(reply.response, FALLBACK_REPLY);
        assert!(!reply.is_crisis);
    }

    #[tokio::test]
    async fn test_crisis_message_flagged_and_alerted() {
        let state = test_state().await;
        let Json(reply) =
            send_message(State(state.clone()), chat("s-2", "I want to end my life")).await;

        assert!(reply.is_crisis);
        assert!(reply.response.ends_with(CRISIS_NOTICE));

        let alerts = state.chat_relay.open_alerts().await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].session_id, "s-2");
    }

    #[tokio::test]
    async fn test_history_returns_pairs_in_order() {
        let state = test_state().await;
        let Json(first) = send_message(State(state.clone()), chat("s-3", "first")).await;
        let Json(second) = send_message(State(state.clone()), chat("s-3", "second")).await;

        let Json(history) = get_history(State(state), Path("s-3".to_string()))
            .await
            .unwrap();
        assert_eq!(history.len(), 4);
        let roles: Vec<MessageRole> = history.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            [
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant
            ]
        );
        assert_eq!(history[0].content, "first");
        assert_eq!(history[2].content, "second");
        assert_eq!(history[1].id, first.id);
        assert_eq!(history[3].id, second.id);
    }

    #[tokio::test]
    async fn test_unknown_session_history_is_empty() {
        let state = test_state().await;
        let Json(history) = get_history(State(state), Path("nobody".to_string()))
            .await
            .unwrap();
        assert!(history.is_empty());
    }
}
