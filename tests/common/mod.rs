#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use social_feed::blob_store::DiskBlobBackend;
use social_feed::config::{BlobstoreConfig, ServerConfig};
use social_feed::context::AppContext;
use social_feed::feed_store::MemoryFeedStore;
use social_feed::server::build_router;

pub const TEST_ORIGIN: &str = "https://feed.example";
pub const BLOB_PUBLIC_URL: &str = "http://localhost:3000/blobs";
pub const MAX_BLOB_SIZE: usize = 1024;

/// Full router over an in-memory feed store and a temp-dir blob store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryFeedStore>,
    pub blob_dir: TempDir,
}

/// Build a test app with the same middleware stack production uses.
pub fn build_test_app() -> TestApp {
    let blob_dir = tempfile::tempdir().unwrap();

    let mut config = ServerConfig::default();
    config.service.allowed_origin = TEST_ORIGIN.to_string();
    config.blobstore = BlobstoreConfig::Disk {
        location: blob_dir.path().to_path_buf(),
        public_url: BLOB_PUBLIC_URL.to_string(),
        max_blob_size: MAX_BLOB_SIZE,
    };

    let store = Arc::new(MemoryFeedStore::new());
    let blobs = Arc::new(DiskBlobBackend::new(
        blob_dir.path().to_path_buf(),
        BLOB_PUBLIC_URL.to_string(),
        MAX_BLOB_SIZE,
    ));

    let ctx = AppContext::with_backends(config, store.clone(), blobs).unwrap();

    TestApp {
        router: build_router(ctx),
        store,
        blob_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, json: Value) -> Response<Body> {
        self.post_raw(uri, "application/json", json.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, content_type: &str, body: String) -> Response<Body> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Submit a post and return its id
    pub async fn submit(&self, author: &str) -> String {
        let response = self
            .post_json(
                "/api/submit",
                serde_json::json!({
                    "sessionId": "session-1",
                    "author": author,
                    "caption": format!("caption by {author}"),
                    "mediaUrl": format!("{BLOB_PUBLIC_URL}/{author}.png"),
                    "mediaType": "image/png",
                }),
            )
            .await;
        assert_eq!(response.status(), 200);
        body_json(response).await["postId"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Posts currently in the feed, newest first
    pub async fn feed(&self) -> Vec<Value> {
        let response = self.get("/api/feed").await;
        assert_eq!(response.status(), 200);
        body_json(response).await["posts"]
            .as_array()
            .unwrap()
            .clone()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
