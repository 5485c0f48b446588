use marketing_campaign_launcher::{config::Config, create_router, AppState, FacebookAPI};
use std::error::Error;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load configuration
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketing_campaign_launcher=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // One client for all requests; credentials are fixed for its lifetime
    let facebook = FacebookAPI::new(&config.meta);
    info!(
        "Meta client ready for {} at {}",
        facebook.ad_account_id(),
        facebook.base_url()
    );

    let app = create_router(AppState::new(Arc::new(facebook)));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Campaign launcher running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
