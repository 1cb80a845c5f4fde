use quote_guard::{server, PriceService, ServiceConfig};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quote_guard=info,quote_guard_server=info".into()),
        )
        .init();

    let config = ServiceConfig::from_env();
    let port = config.port;

    info!(
        asset = config.asset.symbol(),
        mode = ?config.mode,
        api_base_url = %config.api_base_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        rate_limit = config.rate_limit_max_requests,
        rate_window_ms = config.rate_limit_window.as_millis() as u64,
        "Starting quote-guard"
    );

    let service = Arc::new(PriceService::new(config)?);
    let path = server::price_path(service.asset());
    let app = server::router(service);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, path = %path, "Price endpoint listening");

    axum::serve(listener, app).await?;
    Ok(())
}
