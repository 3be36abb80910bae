/// Configuration management for the social feed service
use crate::error::{FeedError, FeedResult};
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub feed_store: FeedStoreConfig,
    pub blobstore: BlobstoreConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    /// Prefix the five feed endpoints are mounted under
    pub base_path: String,
    /// The single origin permitted by CORS
    pub allowed_origin: String,
    /// Request body cap; uploads arrive base64-encoded in JSON
    pub max_body_size: usize,
}

/// Feed store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedStoreConfig {
    /// Sorted-set key holding every post
    pub key: String,
    pub backend: FeedStoreBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedStoreBackend {
    Memory,
    Redis { url: String },
}

/// Blob storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlobstoreConfig {
    Disk {
        location: PathBuf,
        public_url: String,
        max_blob_size: usize,
    },
    Http {
        api_url: String,
        token: String,
    },
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ORIGIN: &str = "https://stenoip.github.io";
const DEFAULT_BLOB_API_URL: &str = "https://blob.vercel-storage.com";
const DEFAULT_MAX_BODY_SIZE: usize = 16 * 1024 * 1024;
const DEFAULT_MAX_BLOB_SIZE: usize = 10 * 1024 * 1024;
const DEFAULT_LOG_FILTER: &str = "social_feed=debug,tower_http=debug";

impl Default for ServerConfig {
    fn default() -> Self {
        let hostname = "0.0.0.0".to_string();
        Self {
            service: ServiceConfig {
                hostname,
                port: DEFAULT_PORT,
                base_path: "/api".to_string(),
                allowed_origin: DEFAULT_ORIGIN.to_string(),
                max_body_size: DEFAULT_MAX_BODY_SIZE,
            },
            feed_store: FeedStoreConfig {
                key: "posts".to_string(),
                backend: FeedStoreBackend::Memory,
            },
            blobstore: BlobstoreConfig::Disk {
                location: PathBuf::from("./data/blobs"),
                public_url: format!("http://localhost:{}/blobs", DEFAULT_PORT),
                max_blob_size: DEFAULT_MAX_BLOB_SIZE,
            },
            logging: LoggingConfig {
                level: DEFAULT_LOG_FILTER.to_string(),
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> FeedResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("FEED_HOSTNAME").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("FEED_PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| FeedError::Validation("Invalid port number".to_string()))?;
        let base_path = env::var("FEED_BASE_PATH").unwrap_or_else(|_| "/api".to_string());
        let allowed_origin =
            env::var("FEED_ALLOWED_ORIGIN").unwrap_or_else(|_| DEFAULT_ORIGIN.to_string());
        let max_body_size = env::var("FEED_MAX_BODY_SIZE")
            .unwrap_or_else(|_| DEFAULT_MAX_BODY_SIZE.to_string())
            .parse()
            .unwrap_or(DEFAULT_MAX_BODY_SIZE);

        let key = env::var("FEED_STORE_KEY").unwrap_or_else(|_| "posts".to_string());
        // KV_URL is what hosted Redis-compatible KV services export
        let backend = match env::var("REDIS_URL").or_else(|_| env::var("KV_URL")) {
            Ok(url) => FeedStoreBackend::Redis { url },
            Err(_) => FeedStoreBackend::Memory,
        };

        let blobstore = if let Ok(token) = env::var("BLOB_READ_WRITE_TOKEN") {
            BlobstoreConfig::Http {
                api_url: env::var("BLOB_API_URL")
                    .unwrap_or_else(|_| DEFAULT_BLOB_API_URL.to_string()),
                token,
            }
        } else {
            BlobstoreConfig::Disk {
                location: env::var("FEED_BLOB_DIRECTORY")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./data/blobs")),
                public_url: env::var("FEED_BLOB_PUBLIC_URL").unwrap_or_else(|_| {
                    let host = if hostname == "0.0.0.0" { "localhost" } else { hostname.as_str() };
                    format!("http://{}:{}/blobs", host, port)
                }),
                max_blob_size: env::var("FEED_BLOB_MAX_SIZE")
                    .unwrap_or_else(|_| DEFAULT_MAX_BLOB_SIZE.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_MAX_BLOB_SIZE),
            }
        };

        let level = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                base_path,
                allowed_origin,
                max_body_size,
            },
            feed_store: FeedStoreConfig { key, backend },
            blobstore,
            logging: LoggingConfig { level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> FeedResult<()> {
        if self.service.hostname.is_empty() {
            return Err(FeedError::Validation("Hostname cannot be empty".to_string()));
        }

        let base_path = &self.service.base_path;
        if !base_path.is_empty() && (!base_path.starts_with('/') || base_path == "/") {
            return Err(FeedError::Validation(format!(
                "Base path must be empty or start with '/': {:?}",
                base_path
            )));
        }

        if HeaderValue::from_str(&self.service.allowed_origin).is_err() {
            return Err(FeedError::Validation(format!(
                "Allowed origin is not a valid header value: {:?}",
                self.service.allowed_origin
            )));
        }

        if self.feed_store.key.is_empty() {
            return Err(FeedError::Validation(
                "Feed store key cannot be empty".to_string(),
            ));
        }

        if let BlobstoreConfig::Http { token, .. } = &self.blobstore {
            if token.is_empty() {
                return Err(FeedError::Validation(
                    "Blob API token cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.hostname, self.service.port)
    }
}
