//! Operator-facing handlers.
//!
//! Endpoints:
//! - GET /api/admin/crisis-alerts - Open crisis alerts, newest first

use axum::extract::State;
use axum::Json;

use mindful_types::chat::CrisisAlert;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/admin/crisis-alerts - List open crisis alerts.
pub async fn list_crisis_alerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<CrisisAlert>>, AppError> {
    let alerts = state.chat_relay.open_alerts().await?;
    Ok(Json(alerts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use mindful_types::chat::{AlertStatus, ChatRequest};

    #[tokio::test]
    async fn test_alerts_empty_then_listed() {
        let state = test_state().await;
        let Json(alerts) = list_crisis_alerts(State(state.clone())).await.unwrap();
        assert!(alerts.is_empty());

        let messages = [
            ("a", "I'm better off dead"),
            ("b", "nice weather"),
            ("c", "thinking about suicide"),
        ];
        for (session, message) in messages {
            state
                .chat_relay
                .relay(&ChatRequest {
                    session_id: session.to_string(),
                    message: message.to_string(),
                })
                .await;
        }

        let Json(alerts) = list_crisis_alerts(State(state)).await.unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.status == AlertStatus::Open));
        assert_eq!(alerts[0].session_id, "c");
        assert_eq!(alerts[1].session_id, "a");
    }
}
