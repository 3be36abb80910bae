/// Blob Storage System
///
/// Stores uploaded media and hands back a public URL for it.
/// Supports a managed HTTP blob service and local disk.

pub mod disk;
pub mod http;
pub mod models;

pub use disk::DiskBlobBackend;
pub use http::HttpBlobBackend;
pub use models::*;

use crate::{config::BlobstoreConfig, error::FeedResult};
use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;
use tracing::info;

/// Length of the random suffix appended to stored names
pub const RANDOM_SUFFIX_LEN: usize = 21;

/// Blob storage backend trait
///
/// Every stored blob is publicly readable at the returned URL.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Store `data` under `pathname` and return where it can be fetched
    async fn put(&self, pathname: &str, data: Vec<u8>, options: &PutOptions)
        -> FeedResult<StoredBlob>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Build the configured blob backend
pub async fn build_backend(config: &BlobstoreConfig) -> FeedResult<Arc<dyn BlobBackend>> {
    let backend: Arc<dyn BlobBackend> = match config {
        BlobstoreConfig::Disk {
            location,
            public_url,
            max_blob_size,
        } => {
            tokio::fs::create_dir_all(location).await?;
            Arc::new(DiskBlobBackend::new(
                location.clone(),
                public_url.clone(),
                *max_blob_size,
            ))
        }
        BlobstoreConfig::Http { api_url, token } => {
            Arc::new(HttpBlobBackend::new(api_url.clone(), token.clone())?)
        }
    };

    info!("Blob store ready (backend: {})", backend.backend_name());
    Ok(backend)
}

/// Insert `-{suffix}` before the extension of the last path segment.
///
/// `photos/cat.png` becomes `photos/cat-{suffix}.png`.
pub fn with_suffix(pathname: &str, suffix: &str) -> String {
    let segment_start = pathname.rfind('/').map_or(0, |i| i + 1);
    let segment = &pathname[segment_start..];

    match segment.rfind('.') {
        Some(dot) if dot > 0 => {
            let split = segment_start + dot;
            format!("{}-{}{}", &pathname[..split], suffix, &pathname[split..])
        }
        _ => format!("{}-{}", pathname, suffix),
    }
}

/// Random alphanumeric suffix for collision avoidance
pub fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect()
}
