//! SQLite forum repository implementation.
//!
//! Posts and replies live in separate tables. Listing a channel loads its
//! posts, then the replies of that channel in one query, grouped by post.

use std::collections::HashMap;

use mindful_core::forum::repository::ForumRepository;
use mindful_types::error::RepositoryError;
use mindful_types::forum::{ForumPost, ForumReply};
use sqlx::Row;
use uuid::Uuid;

use super::chat::{format_datetime, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ForumRepository`.
pub struct SqliteForumRepository {
    pool: DatabasePool,
}

impl SqliteForumRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ForumPostRow {
    id: String,
    channel: String,
    title: String,
    content: String,
    author: String,
    created_at: String,
}

impl ForumPostRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            channel: row.try_get("channel")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            author: row.try_get("author")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_post(self, replies: Vec<ForumReply>) -> Result<ForumPost, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid post id: {e}")))?;

        Ok(ForumPost {
            id,
            channel: self.channel,
            title: self.title,
            content: self.content,
            author: self.author,
            timestamp: parse_datetime(&self.created_at)?,
            replies,
        })
    }
}

struct ForumReplyRow {
    id: String,
    post_id: String,
    content: String,
    author: String,
    created_at: String,
}

impl ForumReplyRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            post_id: row.try_get("post_id")?,
            content: row.try_get("content")?,
            author: row.try_get("author")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_reply(self) -> Result<(String, ForumReply), RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid reply id: {e}")))?;

        let reply = ForumReply {
            id,
            content: self.content,
            author: self.author,
            timestamp: parse_datetime(&self.created_at)?,
        };
        Ok((self.post_id, reply))
    }
}

impl ForumRepository for SqliteForumRepository {
    async fn create_post(&self, post: &ForumPost) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO forum_posts (id, channel, title, content, author, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(post.id.to_string())
        .bind(&post.channel)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.author)
        .bind(format_datetime(&post.timestamp))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_posts(
        &self,
        channel: &str,
        limit: Option<i64>,
    ) -> Result<Vec<ForumPost>, RepositoryError> {
        let mut sql = String::from(
            "SELECT * FROM forum_posts WHERE channel = ? ORDER BY created_at DESC, seq DESC",
        );

        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let post_rows = sqlx::query(&sql)
            .bind(channel)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if post_rows.is_empty() {
            return Ok(Vec::new());
        }

        let reply_rows = sqlx::query(
            r#"SELECT r.* FROM forum_replies r
               JOIN forum_posts p ON p.id = r.post_id
               WHERE p.channel = ?
               ORDER BY r.seq ASC"#,
        )
        .bind(channel)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut replies_by_post: HashMap<String, Vec<ForumReply>> = HashMap::new();
        for row in &reply_rows {
            let (post_id, reply) = ForumReplyRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?
                .into_reply()?;
            replies_by_post.entry(post_id).or_default().push(reply);
        }

        let mut posts = Vec::with_capacity(post_rows.len());
        for row in &post_rows {
            let post_row =
                ForumPostRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            let replies = replies_by_post.remove(&post_row.id).unwrap_or_default();
            posts.push(post_row.into_post(replies)?);
        }

        Ok(posts)
    }

    async fn list_channels(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT DISTINCT channel FROM forum_posts ORDER BY channel")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut channels = Vec::with_capacity(rows.len());
        for row in &rows {
            let channel: String = row
                .try_get("channel")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            channels.push(channel);
        }

        Ok(channels)
    }

    async fn add_reply(
        &self,
        channel: &str,
        post_id: &Uuid,
        reply: &ForumReply,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let exists = sqlx::query("SELECT 1 FROM forum_posts WHERE id = ? AND channel = ?")
            .bind(post_id.to_string())
            .bind(channel)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query(
            r#"INSERT INTO forum_replies (id, post_id, content, author, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(reply.id.to_string())
        .bind(post_id.to_string())
        .bind(&reply.content)
        .bind(&reply.author)
        .bind(format_datetime(&reply.timestamp))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}
