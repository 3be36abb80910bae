/// Redis-backed feed store
///
/// Works against any Redis-protocol service, including hosted KV offerings.
use crate::{
    error::{FeedError, FeedResult},
    feed_store::FeedStore,
};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::{debug, error, info, warn};

/// Redis sorted-set client
#[derive(Clone)]
pub struct RedisFeedStore {
    connection: ConnectionManager,
}

impl RedisFeedStore {
    /// Connect to Redis
    pub async fn connect(url: &str) -> FeedResult<Self> {
        info!("Connecting to Redis feed store");

        let client = Client::open(url).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            FeedError::FeedStore(format!("Redis client creation failed: {}", e))
        })?;

        let connection = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to connect to Redis: {}", e);
            FeedError::FeedStore(format!("Redis connection failed: {}", e))
        })?;

        info!("✓ Redis connection established");

        Ok(Self { connection })
    }
}

#[async_trait]
impl FeedStore for RedisFeedStore {
    async fn add(&self, key: &str, score: i64, member: &str) -> FeedResult<()> {
        debug!("ZADD {} {}", key, score);

        // Millisecond timestamps sit well inside f64's exact integer range
        let mut conn = self.connection.clone();
        let _: i64 = conn.zadd(key, member, score as f64).await.map_err(|e| {
            warn!("Redis ZADD failed for {}: {}", key, e);
            FeedError::FeedStore(format!("ZADD failed: {}", e))
        })?;

        Ok(())
    }

    async fn range(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        rev: bool,
    ) -> FeedResult<Vec<String>> {
        debug!("ZRANGE {} {} {} (rev: {})", key, start, stop, rev);

        let mut conn = self.connection.clone();
        let result: redis::RedisResult<Vec<String>> = if rev {
            conn.zrevrange(key, start, stop).await
        } else {
            conn.zrange(key, start, stop).await
        };

        result.map_err(|e| {
            warn!("Redis ZRANGE failed for {}: {}", key, e);
            FeedError::FeedStore(format!("ZRANGE failed: {}", e))
        })
    }

    async fn remove(&self, key: &str, member: &str) -> FeedResult<u64> {
        debug!("ZREM {}", key);

        let mut conn = self.connection.clone();
        conn.zrem(key, member).await.map_err(|e| {
            warn!("Redis ZREM failed for {}: {}", key, e);
            FeedError::FeedStore(format!("ZREM failed: {}", e))
        })
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
