//! Forum HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/forum/channels                  - Default and used channel names
//! - GET  /api/forum/{channel}                 - Posts of a channel, newest first
//! - POST /api/forum/{channel}                 - Create a post
//! - POST /api/forum/{channel}/{post_id}/reply - Reply to a post

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use mindful_types::forum::{
    ChannelList, CreatePostRequest, CreateReplyRequest, ForumPost, ForumReply,
};

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/forum/channels - List channels.
pub async fn list_channels(State(state): State<AppState>) -> Result<Json<ChannelList>, AppError> {
    let channels = state.forum_service.list_channels().await?;
    Ok(Json(ChannelList { channels }))
}

/// GET /api/forum/{channel} - List posts in a channel.
pub async fn list_posts(
    State(state): State<AppState>,
    Path(channel): Path<String>,
) -> Result<Json<Vec<ForumPost>>, AppError> {
    let posts = state.forum_service.list_posts(&channel).await?;
    Ok(Json(posts))
}

/// POST /api/forum/{channel} - Create a post in a channel.
pub async fn create_post(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Json(request): Json<CreatePostRequest>,
) -> Result<Json<ForumPost>, AppError> {
    let post = state.forum_service.create_post(&channel, request).await?;
    Ok(Json(post))
}

/// POST /api/forum/{channel}/{post_id}/reply - Reply to a post.
///
/// A `post_id` that is not a UUID cannot name a post, so it is a 404.
pub async fn add_reply(
    State(state): State<AppState>,
    Path((channel, post_id)): Path<(String, String)>,
    Json(request): Json<CreateReplyRequest>,
) -> Result<Json<ForumReply>, AppError> {
    let post_id: Uuid = post_id
        .parse()
        .map_err(|_| AppError::NotFound("Post not found".to_string()))?;
    let reply = state
        .forum_service
        .add_reply(&channel, &post_id, request)
        .await?;
    Ok(Json(reply))
}
