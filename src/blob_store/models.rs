/// Blob storage data models
use serde::{Deserialize, Serialize};

/// Options for storing a blob
#[derive(Debug, Clone)]
pub struct PutOptions {
    /// MIME type recorded with the blob
    pub content_type: String,
    /// Append a random suffix to the name so uploads never overwrite each other
    pub add_random_suffix: bool,
}

impl PutOptions {
    /// Public upload with a randomized name
    pub fn public(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            add_random_suffix: true,
        }
    }
}

/// A stored blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBlob {
    /// Public URL
    pub url: String,
    /// Name the blob was stored under, suffix included
    pub pathname: String,
    pub content_type: String,
    pub size: usize,
}

/// Upload response from the managed blob API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobApiPutResponse {
    pub url: String,
    pub pathname: Option<String>,
    pub content_type: Option<String>,
}
