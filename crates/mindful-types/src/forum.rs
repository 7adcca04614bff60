//! Forum channel, post, and reply types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channels that always exist, in display order.
pub const DEFAULT_CHANNELS: [&str; 5] = [
    "general",
    "anxiety",
    "depression",
    "study-stress",
    "relationships",
];

/// A forum post. Belongs to exactly one channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: Uuid,
    pub channel: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    /// Replies in insertion order.
    #[serde(default)]
    pub replies: Vec<ForumReply>,
}

/// A reply appended to a forum post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumReply {
    pub id: Uuid,
    pub content: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /api/forum/{channel}`.
///
/// The channel comes from the path; a `channel` field in the body is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// Body of `POST /api/forum/{channel}/{post_id}/reply`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReplyRequest {
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// Response of `GET /api/forum/channels`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelList {
    pub channels: Vec<String>,
}
