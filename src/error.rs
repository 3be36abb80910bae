/// Unified error types for the social feed service
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Main error type for the feed service
#[derive(Error, Debug)]
pub enum FeedError {
    /// Client input errors (missing or malformed fields)
    #[error("{0}")]
    Validation(String),

    /// Unknown post or route
    #[error("{0}")]
    NotFound(String),

    /// Sorted-set store errors
    #[error("Feed store error: {0}")]
    FeedStore(String),

    /// Blob storage errors
    #[error("Blob storage error: {0}")]
    BlobStorage(String),

    /// A stored member or upstream payload did not (de)serialize
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An infrastructure failure surfaced to the client under a public message
    #[error("{message}: {source}")]
    Failed {
        message: &'static str,
        #[source]
        source: Box<FeedError>,
    },
}

impl FeedError {
    /// Whether the error is the caller's fault (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, FeedError::Validation(_) | FeedError::NotFound(_))
    }

    /// Wrap an infrastructure error with the endpoint's public failure message.
    ///
    /// Client errors pass through untouched. Everything else is logged here,
    /// with full detail, and collapses to a 500 carrying only `message`.
    pub fn or_fail(self, message: &'static str) -> Self {
        if self.is_client_error() || matches!(self, FeedError::Failed { .. }) {
            return self;
        }
        error!("{}: {}", message, self);
        FeedError::Failed {
            message,
            source: Box::new(self),
        }
    }
}

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Convert FeedError to HTTP response
impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            FeedError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            FeedError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            FeedError::Failed { message, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
            other => {
                error!("Unhandled error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(), // Don't leak details
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Result type alias for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_pass_through_or_fail() {
        let err = FeedError::NotFound("Post not found".to_string()).or_fail("Failed to like post");
        assert!(matches!(err, FeedError::NotFound(_)));

        let err = FeedError::Validation("Missing postId".to_string()).or_fail("Failed to like post");
        assert!(matches!(err, FeedError::Validation(_)));
    }

    #[test]
    fn test_infrastructure_errors_are_wrapped() {
        let err = FeedError::FeedStore("connection refused".to_string())
            .or_fail("Failed to fetch feed");
        match err {
            FeedError::Failed { message, source } => {
                assert_eq!(message, "Failed to fetch feed");
                assert!(source.to_string().contains("connection refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrapping_is_idempotent() {
        let err = FeedError::Internal("boom".to_string())
            .or_fail("Failed to submit post")
            .or_fail("Failed to fetch feed");
        assert!(matches!(
            err,
            FeedError::Failed {
                message: "Failed to submit post",
                ..
            }
        ));
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (FeedError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (FeedError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (FeedError::FeedStore("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                FeedError::Internal("x".into()).or_fail("Failed"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
