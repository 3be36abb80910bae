/// Application context and dependency injection
use crate::{
    blob_store::{self, BlobBackend},
    config::ServerConfig,
    error::{FeedError, FeedResult},
    feed::FeedService,
    feed_store::{self, FeedStore},
};
use axum::http::HeaderValue;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub feed: FeedService,
    pub blob_store: Arc<dyn BlobBackend>,
    /// Pre-validated `Access-Control-Allow-Origin` value
    pub allowed_origin: HeaderValue,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> FeedResult<Self> {
        // Validate configuration
        config.validate()?;

        let feed_store = feed_store::connect(&config.feed_store).await?;
        let blob_store = blob_store::build_backend(&config.blobstore).await?;

        Self::with_backends(config, feed_store, blob_store)
    }

    /// Create a context around already-built backends
    pub fn with_backends(
        config: ServerConfig,
        feed_store: Arc<dyn FeedStore>,
        blob_store: Arc<dyn BlobBackend>,
    ) -> FeedResult<Self> {
        config.validate()?;

        let allowed_origin = HeaderValue::from_str(&config.service.allowed_origin)
            .map_err(|e| FeedError::Internal(format!("Invalid allowed origin: {}", e)))?;
        let feed = FeedService::new(feed_store, config.feed_store.key.clone());

        Ok(Self {
            config: Arc::new(config),
            feed,
            blob_store,
            allowed_origin,
        })
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}{}",
            self.config.bind_address(),
            self.config.service.base_path
        )
    }
}
