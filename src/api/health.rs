/// Health check endpoints
use crate::context::AppContext;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tracing::warn;

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/health/ready", get(readiness_probe))
}

/// Basic health check
pub async fn health_basic() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe
///
/// Returns 503 if the feed store cannot be read.
pub async fn readiness_probe(State(ctx): State<AppContext>) -> Result<Json<Value>, StatusCode> {
    if let Err(e) = ctx.feed.probe().await {
        warn!(error = %e, "readiness_probe_failed: feed store check failed");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION"),
        "feedStore": ctx.feed.backend_name(),
        "blobStore": ctx.blob_store.backend_name(),
    })))
}
