/// Post endpoints: submit, feed, like, comment
use crate::{
    api::{extract::JsonBody, method_not_allowed},
    context::AppContext,
    error::{FeedError, FeedResult},
    feed::{NewPost, Post},
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Build post routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/submit", post(submit_post).fallback(method_not_allowed))
        .route("/feed", get(get_feed).fallback(method_not_allowed))
        .route("/like", post(like_post).fallback(method_not_allowed))
        .route("/comment", post(add_comment).fallback(method_not_allowed))
}

/// Submission form body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPostRequest {
    pub session_id: Option<String>,
    pub author: Option<String>,
    pub caption: Option<String>,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
}

impl SubmitPostRequest {
    /// All five fields must be present; empty strings are allowed.
    fn into_new_post(self) -> Option<NewPost> {
        // sessionId belongs to the submission form, not to the post
        self.session_id?;
        Some(NewPost {
            author: self.author?,
            caption: self.caption?,
            media_url: self.media_url?,
            media_type: self.media_type?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub post_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub post_id: Option<String>,
    pub author: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPostResponse {
    pub success: bool,
    pub post_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub posts: Vec<Post>,
}

/// POST /submit
async fn submit_post(
    State(ctx): State<AppContext>,
    JsonBody(req): JsonBody<SubmitPostRequest>,
) -> FeedResult<Json<SubmitPostResponse>> {
    let new_post = req
        .into_new_post()
        .ok_or_else(|| FeedError::Validation("Missing required fields".to_string()))?;

    let post = ctx
        .feed
        .create_post(new_post)
        .await
        .map_err(|e| e.or_fail("Failed to submit post"))?;

    Ok(Json(SubmitPostResponse {
        success: true,
        post_id: post.id,
    }))
}

/// GET /feed
async fn get_feed(State(ctx): State<AppContext>) -> FeedResult<Json<FeedResponse>> {
    let posts = ctx
        .feed
        .list_posts()
        .await
        .map_err(|e| e.or_fail("Failed to fetch feed"))?;

    Ok(Json(FeedResponse { posts }))
}

/// POST /like
async fn like_post(
    State(ctx): State<AppContext>,
    JsonBody(req): JsonBody<LikeRequest>,
) -> FeedResult<Json<SuccessResponse>> {
    let post_id = req
        .post_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| FeedError::Validation("Missing postId".to_string()))?;

    ctx.feed
        .like_post(&post_id)
        .await
        .map_err(|e| e.or_fail("Failed to like post"))?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /comment
async fn add_comment(
    State(ctx): State<AppContext>,
    JsonBody(req): JsonBody<CommentRequest>,
) -> FeedResult<Json<SuccessResponse>> {
    let (Some(post_id), Some(author), Some(text)) = (req.post_id, req.author, req.text) else {
        return Err(FeedError::Validation("Missing required fields".to_string()));
    };

    ctx.feed
        .add_comment(&post_id, author, text)
        .await
        .map_err(|e| e.or_fail("Failed to add comment"))?;

    Ok(Json(SuccessResponse { success: true }))
}
