//! Chat relay request/response, stored message, and crisis alert types.
//!
//! A session is nothing more than a client-generated string shared by the
//! messages of one conversation; there is no session record of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

// Re-export MessageRole from llm module (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Reply envelope returned by the chat relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// Id of the stored assistant message.
    pub id: Uuid,
    pub response: String,
    pub is_crisis: bool,
    pub timestamp: DateTime<Utc>,
}

/// A single stored message within a chat session.
///
/// Messages are returned in insertion order within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub is_crisis: bool,
}

/// Review status of a crisis alert.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('open', 'resolved'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Open,
    Resolved,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertStatus::Open => write!(f, "open"),
            AlertStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(AlertStatus::Open),
            "resolved" => Ok(AlertStatus::Resolved),
            other => Err(format!("invalid alert status: '{other}'")),
        }
    }
}

/// A chat message that tripped the crisis matcher, kept for operator review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisAlert {
    pub id: Uuid,
    pub session_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: AlertStatus,
}

impl CrisisAlert {
    /// Open a new alert for a flagged message.
    pub fn open(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id: session_id.into(),
            message: message.into(),
            timestamp: Utc::now(),
            status: AlertStatus::Open,
        }
    }
}
