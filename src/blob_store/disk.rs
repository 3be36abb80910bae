/// Disk-based blob storage backend
use crate::{
    blob_store::{random_suffix, with_suffix, BlobBackend, PutOptions, StoredBlob},
    error::{FeedError, FeedResult},
};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Disk storage backend
///
/// Writes blobs flat into one directory. The server exposes that directory
/// statically, so `public_url` should point at the same place.
#[derive(Clone)]
pub struct DiskBlobBackend {
    base_path: PathBuf,
    public_url: String,
    max_blob_size: usize,
}

impl DiskBlobBackend {
    /// Create a new disk storage backend
    pub fn new(base_path: PathBuf, public_url: String, max_blob_size: usize) -> Self {
        Self {
            base_path,
            public_url: public_url.trim_end_matches('/').to_string(),
            max_blob_size,
        }
    }

    /// Reduce a client-supplied name to a single safe file name
    fn sanitize_name(pathname: &str) -> String {
        let last = pathname
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or_default();

        let cleaned: String = last
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        let cleaned = cleaned.trim_start_matches('.');
        if cleaned.is_empty() {
            "blob".to_string()
        } else {
            cleaned.to_string()
        }
    }
}

#[async_trait]
impl BlobBackend for DiskBlobBackend {
    async fn put(
        &self,
        pathname: &str,
        data: Vec<u8>,
        options: &PutOptions,
    ) -> FeedResult<StoredBlob> {
        if data.len() > self.max_blob_size {
            return Err(FeedError::BlobStorage(format!(
                "Blob of {} bytes exceeds limit of {} bytes",
                data.len(),
                self.max_blob_size
            )));
        }

        let mut name = Self::sanitize_name(pathname);
        if options.add_random_suffix {
            name = with_suffix(&name, &random_suffix());
        }

        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            FeedError::BlobStorage(format!("Failed to create blob directory: {}", e))
        })?;

        let size = data.len();
        let blob_path = self.base_path.join(&name);
        fs::write(&blob_path, data).await.map_err(|e| {
            FeedError::BlobStorage(format!("Failed to write blob {}: {}", name, e))
        })?;

        debug!("Stored blob {} ({} bytes, {})", name, size, options.content_type);

        Ok(StoredBlob {
            url: format!("{}/{}", self.public_url, name),
            pathname: name,
            content_type: options.content_type.clone(),
            size,
        })
    }

    fn backend_name(&self) -> &'static str {
        "disk"
    }
}
