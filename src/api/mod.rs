/// API routes and handlers
pub mod extract;
pub mod health;
pub mod middleware;
pub mod posts;
pub mod upload;

use crate::{context::AppContext, error::ErrorResponse};
use axum::{http::StatusCode, Json, Router};

/// Build the feed API routes, mounted under the configured base path
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(upload::routes())
        .merge(posts::routes())
}

/// Known path, wrong method
pub async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Unknown path
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not Found")))
}
