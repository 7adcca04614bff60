//! ChatRepository trait definition.
//!
//! Append-only storage for chat exchanges plus the crisis alert log.
//! Follows the RPITIT pattern used by every repository in this crate.

use mindful_types::chat::{AlertStatus, ChatMessage, CrisisAlert};
use mindful_types::error::RepositoryError;

/// Repository trait for chat message and crisis alert persistence.
///
/// Implementations live in mindful-infra (e.g., `SqliteChatRepository`).
pub trait ChatRepository: Send + Sync {
    /// Persist one user/assistant exchange atomically, user message first.
    fn save_exchange(
        &self,
        user: &ChatMessage,
        assistant: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get messages for a session in insertion order.
    fn get_messages(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Record a crisis alert.
    fn save_alert(
        &self,
        alert: &CrisisAlert,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List alerts with the given status, newest first.
    fn list_alerts(
        &self,
        status: AlertStatus,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<CrisisAlert>, RepositoryError>> + Send;
}
