/// Managed blob service backend
///
/// Uploads go to a hosted blob API over HTTPS: `PUT {api_url}/{pathname}`
/// with the raw bytes as body. The service picks the final name (including
/// any random suffix) and answers with the public URL.
use crate::{
    blob_store::{BlobApiPutResponse, BlobBackend, PutOptions, StoredBlob},
    error::{FeedError, FeedResult},
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, error, info};

/// API version header the blob service expects
const BLOB_API_VERSION: &str = "7";

/// HTTP blob backend
#[derive(Clone)]
pub struct HttpBlobBackend {
    client: Client,
    api_url: Url,
    token: String,
}

impl HttpBlobBackend {
    /// Create a new HTTP blob backend
    pub fn new(api_url: String, token: String) -> FeedResult<Self> {
        let api_url = Url::parse(&api_url).map_err(|e| {
            FeedError::Validation(format!("Invalid blob API URL {:?}: {}", api_url, e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| FeedError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        info!("Using managed blob API at {}", api_url);

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// Upload URL for a pathname, each segment percent-encoded
    fn upload_url(&self, pathname: &str) -> FeedResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| FeedError::Internal(format!("Blob API URL cannot be a base: {}", self.api_url)))?
            .pop_if_empty()
            .extend(pathname.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }
}

#[async_trait]
impl BlobBackend for HttpBlobBackend {
    async fn put(
        &self,
        pathname: &str,
        data: Vec<u8>,
        options: &PutOptions,
    ) -> FeedResult<StoredBlob> {
        let url = self.upload_url(pathname)?;
        let size = data.len();

        debug!(
            "Uploading blob to {} ({} bytes, type: {})",
            url, size, options.content_type
        );

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .header("x-api-version", BLOB_API_VERSION)
            .header("x-content-type", &options.content_type)
            .header(
                "x-add-random-suffix",
                if options.add_random_suffix { "1" } else { "0" },
            )
            .body(data)
            .send()
            .await
            .map_err(|e| {
                error!("Blob upload request failed: {}", e);
                FeedError::BlobStorage(format!("Upload request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Blob API rejected upload ({}): {}", status, body);
            return Err(FeedError::BlobStorage(format!(
                "Blob API returned {}",
                status
            )));
        }

        let uploaded: BlobApiPutResponse = response.json().await.map_err(|e| {
            FeedError::BlobStorage(format!("Invalid blob API response: {}", e))
        })?;

        debug!("✓ Blob uploaded: {}", uploaded.url);

        Ok(StoredBlob {
            pathname: uploaded.pathname.unwrap_or_else(|| pathname.to_string()),
            content_type: uploaded
                .content_type
                .unwrap_or_else(|| options.content_type.clone()),
            url: uploaded.url,
            size,
        })
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
