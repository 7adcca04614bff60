//! Forum service: channel listing, post listing, post and reply creation.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use mindful_types::error::{ForumError, RepositoryError};
use mindful_types::forum::{
    CreatePostRequest, CreateReplyRequest, DEFAULT_CHANNELS, ForumPost, ForumReply,
};

use crate::forum::author::resolve_author;
use crate::forum::repository::ForumRepository;

/// Maximum number of posts returned for one channel.
pub const POST_LIMIT: i64 = 100;

/// Validates forum input and delegates storage to a `ForumRepository`.
pub struct ForumService<F: ForumRepository> {
    forum_repo: F,
}

impl<F: ForumRepository> ForumService<F> {
    pub fn new(forum_repo: F) -> Self {
        Self { forum_repo }
    }

    /// The default channels in display order, then any other channel that
    /// already holds posts, sorted by name.
    pub async fn list_channels(&self) -> Result<Vec<String>, ForumError> {
        let mut extra: Vec<String> = self
            .forum_repo
            .list_channels()
            .await?
            .into_iter()
            .filter(|c| !DEFAULT_CHANNELS.contains(&c.as_str()))
            .collect();
        extra.sort();
        extra.dedup();

        let mut channels: Vec<String> = DEFAULT_CHANNELS.iter().map(|c| c.to_string()).collect();
        channels.extend(extra);
        Ok(channels)
    }

    /// Posts of a channel, newest first. Unknown channels yield an empty list.
    pub async fn list_posts(&self, channel: &str) -> Result<Vec<ForumPost>, ForumError> {
        Ok(self.forum_repo.list_posts(channel, Some(POST_LIMIT)).await?)
    }

    /// Validate and persist a new post.
    pub async fn create_post(
        &self,
        channel: &str,
        request: CreatePostRequest,
    ) -> Result<ForumPost, ForumError> {
        let channel = require("channel", channel)?;
        let title = require("title", &request.title)?;
        let content = require("content", &request.content)?;

        let post = ForumPost {
            id: Uuid::now_v7(),
            channel: channel.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            author: resolve_author(request.author.as_deref()),
            timestamp: Utc::now(),
            replies: Vec::new(),
        };

        self.forum_repo.create_post(&post).await?;
        info!(post_id = %post.id, channel = %post.channel, "Forum post created");
        Ok(post)
    }

    /// Validate and append a reply to an existing post in `channel`.
    pub async fn add_reply(
        &self,
        channel: &str,
        post_id: &Uuid,
        request: CreateReplyRequest,
    ) -> Result<ForumReply, ForumError> {
        let content = require("content", &request.content)?;

        let reply = ForumReply {
            id: Uuid::now_v7(),
            content: content.to_string(),
            author: resolve_author(request.author.as_deref()),
            timestamp: Utc::now(),
        };

        match self.forum_repo.add_reply(channel, post_id, &reply).await {
            Ok(()) => {
                info!(post_id = %post_id, reply_id = %reply.id, "Forum reply added");
                Ok(reply)
            }
            Err(RepositoryError::NotFound) => Err(ForumError::PostNotFound),
            Err(e) => Err(e.into()),
        }
    }
}

/// Trimmed value of a required text field.
fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, ForumError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ForumError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed)
}
