/// Social Feed - media posts, likes and comments over a sorted-set store
use social_feed::{config::ServerConfig, context::AppContext, error::FeedResult, server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> FeedResult<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    // Create application context
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
   ___           _      _   ___            _
  / __| ___  __ (_) __ | | | __|___  ___ __| |
  \__ \/ _ \/ _|| |/ _`| | | _|/ -_)/ -_) _` |
  |___/\___/\__||_|\__,|_| |_| \___|\___\__,_|

        Social Feed v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
