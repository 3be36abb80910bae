/// HTTP server setup and routing
use crate::{
    api::{self, middleware::cors},
    config::BlobstoreConfig,
    context::AppContext,
    error::{FeedError, FeedResult},
};
use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

/// Build the main application router
/// Returns Router<()> because state is already provided
pub fn build_router(ctx: AppContext) -> Router {
    let base_path = ctx.config.service.base_path.clone();

    let feed_api = if base_path.is_empty() {
        api::routes()
    } else {
        Router::new().nest(&base_path, api::routes())
    };

    let mut router = Router::new()
        .merge(api::health::routes())
        .merge(feed_api);

    // Disk-stored blobs are served from here so their URLs resolve
    if let BlobstoreConfig::Disk { location, .. } = &ctx.config.blobstore {
        router = router.nest_service("/blobs", ServeDir::new(location));
    }

    router
        .fallback(api::not_found)
        // Provide state - converts Router<AppContext> to Router<()>
        .with_state(ctx.clone())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(ctx.clone(), cors))
                .layer(DefaultBodyLimit::max(ctx.config.service.max_body_size)),
        )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> FeedResult<()> {
    let addr = ctx.config.bind_address();

    info!("Social feed listening on {}", addr);
    info!("   API base: {}", ctx.service_url());
    info!(
        "   Feed store: {} (key: {})",
        ctx.feed.backend_name(),
        ctx.feed.key()
    );
    info!("   Blob store: {}", ctx.blob_store.backend_name());

    let app = build_router(ctx);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FeedError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FeedError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Resolve on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
