//! ForumRepository trait definition.

use mindful_types::error::RepositoryError;
use mindful_types::forum::{ForumPost, ForumReply};
use uuid::Uuid;

/// Repository trait for forum post persistence.
///
/// Implementations live in mindful-infra (e.g., `SqliteForumRepository`).
pub trait ForumRepository: Send + Sync {
    /// Insert a new post. Its `replies` are ignored.
    fn create_post(
        &self,
        post: &ForumPost,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Posts of a channel, newest first, each with its replies in insertion order.
    fn list_posts(
        &self,
        channel: &str,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<ForumPost>, RepositoryError>> + Send;

    /// Distinct channel names that hold at least one post.
    fn list_channels(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Append a reply to a post.
    ///
    /// Returns `RepositoryError::NotFound` when no post with `post_id` exists
    /// in `channel`.
    fn add_reply(
        &self,
        channel: &str,
        post_id: &Uuid,
        reply: &ForumReply,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
