/// Feed operations over the sorted-set store
///
/// Every post lives as one JSON member of a single sorted set. There is no
/// index by id: likes and comments scan the whole set, then swap the old
/// member for a re-serialized one under the same score.
use crate::{
    error::{FeedError, FeedResult},
    feed::models::{timestamp_millis, Comment, NewPost, Post},
    feed_store::FeedStore,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Feed service
#[derive(Clone)]
pub struct FeedService {
    store: Arc<dyn FeedStore>,
    key: String,
}

impl FeedService {
    pub fn new(store: Arc<dyn FeedStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Sorted-set key holding the posts
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Cheap read confirming the store answers
    pub async fn probe(&self) -> FeedResult<()> {
        self.store.range(&self.key, 0, 0, false).await.map(|_| ())
    }

    /// Create a post and add it to the feed, scored by its creation time
    pub async fn create_post(&self, new_post: NewPost) -> FeedResult<Post> {
        // One clock reading feeds both created_at and the score
        let now = Utc::now();
        let post = Post::create(Uuid::new_v4().to_string(), new_post, now);
        let member = serde_json::to_string(&post)?;

        self.store
            .add(&self.key, now.timestamp_millis(), &member)
            .await?;

        info!("Created post {} by {:?}", post.id, post.author);
        Ok(post)
    }

    /// Every post, newest first
    pub async fn list_posts(&self) -> FeedResult<Vec<Post>> {
        let members = self.store.range(&self.key, 0, -1, true).await?;
        debug!("Loaded {} feed members", members.len());

        members
            .iter()
            .map(|member| serde_json::from_str(member).map_err(FeedError::from))
            .collect()
    }

    /// Add one like to a post
    pub async fn like_post(&self, id: &str) -> FeedResult<Post> {
        self.update_post(id, |post| {
            post.likes_count = post.likes_count.saturating_add(1);
        })
        .await
    }

    /// Append a comment to a post
    pub async fn add_comment(&self, id: &str, author: String, text: String) -> FeedResult<Post> {
        let comment = Comment::new(author, text, Utc::now());
        self.update_post(id, move |post| post.comments.push(comment))
            .await
    }

    /// Apply `mutate` to the post with `id` and write it back in place.
    ///
    /// Scan, remove the old member by exact value, add the new one. The three
    /// store calls are not atomic: two updates racing on one post can both
    /// read the same member, and each re-adds its own copy with only its own
    /// change applied.
    pub async fn update_post<F>(&self, id: &str, mutate: F) -> FeedResult<Post>
    where
        F: FnOnce(&mut Post) + Send,
    {
        let members = self.store.range(&self.key, 0, -1, false).await?;
        let old_member = find_member(&members, id)?
            .ok_or_else(|| FeedError::NotFound("Post not found".to_string()))?;

        let mut post: Post = serde_json::from_str(old_member)?;
        mutate(&mut post);

        let score = timestamp_millis(&post.created_at).ok_or_else(|| {
            FeedError::Internal(format!(
                "Post {} has unparseable created_at {:?}",
                id, post.created_at
            ))
        })?;
        let new_member = serde_json::to_string(&post)?;

        let removed = self.store.remove(&self.key, old_member).await?;
        if removed == 0 {
            warn!(
                "Post {} changed between read and write; concurrent update may be lost",
                id
            );
        }
        self.store.add(&self.key, score, &new_member).await?;

        debug!("Updated post {} (score {})", id, score);
        Ok(post)
    }
}

/// First member whose `id` equals `id`, in store order.
///
/// Members are parsed one at a time; a malformed member before the match is
/// an error.
fn find_member<'a>(members: &'a [String], id: &str) -> FeedResult<Option<&'a str>> {
    for member in members {
        let value: Value = serde_json::from_str(member)?;
        if value.get("id").and_then(Value::as_str) == Some(id) {
            return Ok(Some(member));
        }
    }
    Ok(None)
}
