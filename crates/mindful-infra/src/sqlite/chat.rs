//! SQLite chat repository implementation.
//!
//! Implements `ChatRepository` from `mindful-core`: raw queries, private Row
//! structs, writes on the writer pool and reads on the reader pool.

use chrono::{DateTime, Utc};
use mindful_core::chat::repository::ChatRepository;
use mindful_types::chat::{AlertStatus, ChatMessage, CrisisAlert};
use mindful_types::error::RepositoryError;
use mindful_types::llm::MessageRole;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatRepository`.
pub struct SqliteChatRepository {
    pool: DatabasePool,
}

impl SqliteChatRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatMessageRow {
    id: String,
    session_id: String,
    role: String,
    content: String,
    created_at: String,
    is_crisis: bool,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            is_crisis: row.try_get("is_crisis")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            id,
            session_id: self.session_id,
            role,
            content: self.content,
            timestamp: parse_datetime(&self.created_at)?,
            is_crisis: self.is_crisis,
        })
    }
}

struct CrisisAlertRow {
    id: String,
    session_id: String,
    message: String,
    created_at: String,
    status: String,
}

impl CrisisAlertRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            message: row.try_get("message")?,
            created_at: row.try_get("created_at")?,
            status: row.try_get("status")?,
        })
    }

    fn into_alert(self) -> Result<CrisisAlert, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid alert id: {e}")))?;
        let status: AlertStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(CrisisAlert {
            id,
            session_id: self.session_id,
            message: self.message,
            timestamp: parse_datetime(&self.created_at)?,
            status,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

const INSERT_MESSAGE: &str = r#"INSERT INTO chat_messages (id, session_id, role, content, created_at, is_crisis)
   VALUES (?, ?, ?, ?, ?, ?)"#;

// ---------------------------------------------------------------------------
// ChatRepository implementation
// ---------------------------------------------------------------------------

impl ChatRepository for SqliteChatRepository {
    async fn save_exchange(
        &self,
        user: &ChatMessage,
        assistant: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        for message in [user, assistant] {
            sqlx::query(INSERT_MESSAGE)
                .bind(message.id.to_string())
                .bind(&message.session_id)
                .bind(message.role.to_string())
                .bind(&message.content)
                .bind(format_datetime(&message.timestamp))
                .bind(message.is_crisis)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_messages(
        &self,
        session_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut sql =
            String::from("SELECT * FROM chat_messages WHERE session_id = ? ORDER BY seq ASC");

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let rows = sqlx::query(&sql)
            .bind(session_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row = ChatMessageRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn save_alert(&self, alert: &CrisisAlert) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO crisis_alerts (id, session_id, message, created_at, status)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(alert.id.to_string())
        .bind(&alert.session_id)
        .bind(&alert.message)
        .bind(format_datetime(&alert.timestamp))
        .bind(alert.status.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_alerts(
        &self,
        status: AlertStatus,
        limit: Option<i64>,
    ) -> Result<Vec<CrisisAlert>, RepositoryError> {
        let mut sql = String::from(
            "SELECT * FROM crisis_alerts WHERE status = ? ORDER BY created_at DESC, seq DESC",
        );

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let rows = sqlx::query(&sql)
            .bind(status.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut alerts = Vec::with_capacity(rows.len());
        for row in &rows {
            let alert_row = CrisisAlertRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            alerts.push(alert_row.into_alert()?);
        }

        Ok(alerts)
    }
}
