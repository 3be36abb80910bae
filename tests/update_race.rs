//! The in-place update protocol (scan, remove old member, add new member) is
//! not atomic. These tests pin down what that means for callers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Barrier;
use tokio_test::assert_ok;

use social_feed::error::FeedResult;
use social_feed::feed::{FeedService, NewPost, Post};
use social_feed::feed_store::{FeedStore, MemoryFeedStore};

/// Memory store that parks every ascending scan until `parties` scans have
/// happened, forcing concurrent updates to read the same snapshot.
struct LockstepStore {
    inner: MemoryFeedStore,
    barrier: Barrier,
}

impl LockstepStore {
    fn new(parties: usize) -> Self {
        Self {
            inner: MemoryFeedStore::new(),
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl FeedStore for LockstepStore {
    async fn add(&self, key: &str, score: i64, member: &str) -> FeedResult<()> {
        self.inner.add(key, score, member).await
    }

    async fn range(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        rev: bool,
    ) -> FeedResult<Vec<String>> {
        let members = self.inner.range(key, start, stop, rev).await?;
        if !rev {
            self.barrier.wait().await;
        }
        Ok(members)
    }

    async fn remove(&self, key: &str, member: &str) -> FeedResult<u64> {
        self.inner.remove(key, member).await
    }

    fn backend_name(&self) -> &'static str {
        "lockstep"
    }
}

fn new_post() -> NewPost {
    NewPost {
        author: "ada".to_string(),
        caption: "sunset".to_string(),
        media_url: "https://blobs.example/sunset.jpg".to_string(),
        media_type: "image/jpeg".to_string(),
    }
}

fn copies_of(posts: Vec<Post>, id: &str) -> Vec<Post> {
    posts.into_iter().filter(|post| post.id == id).collect()
}

#[tokio::test]
async fn sequential_like_and_comment_both_apply() {
    let feed = FeedService::new(Arc::new(MemoryFeedStore::new()), "posts");
    let post = assert_ok!(feed.create_post(new_post()).await);

    assert_ok!(feed.like_post(&post.id).await);
    assert_ok!(
        feed.add_comment(&post.id, "bob".to_string(), "nice".to_string())
            .await
    );

    let copies = copies_of(assert_ok!(feed.list_posts().await), &post.id);
    assert_eq!(copies.len(), 1);
    assert_eq!(copies[0].likes_count, 1);
    assert_eq!(copies[0].comments.len(), 1);
}

#[tokio::test]
async fn racing_like_and_comment_lose_an_update() {
    let feed = FeedService::new(Arc::new(LockstepStore::new(2)), "posts");
    let post = assert_ok!(feed.create_post(new_post()).await);

    // Both updates scan before either writes back
    let (liked, commented) = tokio::join!(
        feed.like_post(&post.id),
        feed.add_comment(&post.id, "bob".to_string(), "nice".to_string()),
    );
    assert_ok!(liked);
    assert_ok!(commented);

    // Each re-added its own copy; neither copy carries both effects
    let copies = copies_of(assert_ok!(feed.list_posts().await), &post.id);
    assert_eq!(copies.len(), 2);
    assert!(copies
        .iter()
        .all(|copy| !(copy.likes_count == 1 && copy.comments.len() == 1)));
    assert!(copies.iter().any(|copy| copy.likes_count == 1));
    assert!(copies.iter().any(|copy| copy.comments.len() == 1));

    // Both copies keep the creation score
    assert!(copies.iter().all(|copy| copy.created_at == post.created_at));
}
