/// Feed Store
///
/// A sorted set of serialized posts scored by creation time in milliseconds.
/// Members are opaque strings to the store; it never looks inside them.

pub mod memory;
pub mod redis_store;

pub use memory::MemoryFeedStore;
pub use redis_store::RedisFeedStore;

use crate::{
    config::{FeedStoreBackend, FeedStoreConfig},
    error::FeedResult,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Sorted-set backend trait
///
/// Index arguments follow Redis `ZRANGE` semantics: inclusive on both ends,
/// negative values count back from the last member (`-1` is the last).
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Add a member with a score, replacing the score if the member exists
    async fn add(&self, key: &str, score: i64, member: &str) -> FeedResult<()>;

    /// Members between `start` and `stop` by ascending score, or descending when `rev`
    async fn range(&self, key: &str, start: isize, stop: isize, rev: bool)
        -> FeedResult<Vec<String>>;

    /// Remove a member by exact value, returning how many were removed (0 or 1)
    async fn remove(&self, key: &str, member: &str) -> FeedResult<u64>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Build the configured feed store
pub async fn connect(config: &FeedStoreConfig) -> FeedResult<Arc<dyn FeedStore>> {
    let store: Arc<dyn FeedStore> = match &config.backend {
        FeedStoreBackend::Redis { url } => Arc::new(RedisFeedStore::connect(url).await?),
        FeedStoreBackend::Memory => {
            warn!("No Redis URL configured; posts are kept in memory and lost on restart");
            Arc::new(MemoryFeedStore::new())
        }
    };

    info!(
        "Feed store ready (backend: {}, key: {})",
        store.backend_name(),
        config.key
    );

    Ok(store)
}
