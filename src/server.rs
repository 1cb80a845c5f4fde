//! HTTP endpoint polled by the browser

use crate::{
    error::PriceError,
    service::PriceService,
    types::{Asset, CacheInfo, PriceResponse},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Failure of the price endpoint; always a generic 500 to the client
#[derive(Debug)]
pub struct QuoteFetchError {
    asset: Asset,
    source: PriceError,
}

impl IntoResponse for QuoteFetchError {
    fn into_response(self) -> Response {
        tracing::error!(
            asset = self.asset.symbol(),
            error = %self.source,
            "Price endpoint failed"
        );
        let message = format!("Failed to fetch {} price", self.asset.display_name());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}

/// Path of the price endpoint, e.g. `/api/crypto/ethereum-price`
pub fn price_path(asset: Asset) -> String {
    format!("/api/crypto/{}-price", asset.coingecko_id())
}

/// Builds the router around a shared service
pub fn router(service: Arc<PriceService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(&price_path(service.asset()), get(price_handler))
        .route("/api/crypto/cache-info", get(cache_info_handler))
        .with_state(service)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn price_handler(
    State(service): State<Arc<PriceService>>,
) -> Result<Json<PriceResponse>, QuoteFetchError> {
    service
        .market_snapshot()
        .await
        .map(|snapshot| Json(PriceResponse::from(snapshot)))
        .map_err(|source| QuoteFetchError {
            asset: service.asset(),
            source,
        })
}

async fn cache_info_handler(State(service): State<Arc<PriceService>>) -> Json<CacheInfo> {
    Json(service.cache_info().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::provider::mock::{MockProvider, MockResponse};
    use crate::retry::RetryPolicy;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(provider: MockProvider) -> Router {
        let config = ServiceConfig {
            retry: RetryPolicy::new(2, 1),
            ..ServiceConfig::default()
        };
        router(Arc::new(PriceService::with_provider(config, Arc::new(provider))))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_price_path() {
        assert_eq!(price_path(Asset::ETH), "/api/crypto/ethereum-price");
        assert_eq!(price_path(Asset::BTC), "/api/crypto/bitcoin-price");
    }

    #[tokio::test]
    async fn test_price_endpoint_returns_quote() {
        let (status, body) = get_json(
            app(MockProvider::with_eth_price(3000.0, 1.5)),
            "/api/crypto/ethereum-price",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"], 3000.0);
        assert_eq!(body["change24h"], 1.5);
        assert_eq!(body["changePercent24h"], 1.5);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_price_endpoint_failure_is_500() {
        let provider = MockProvider::failing(MockResponse::Status(500, "oops".to_string()));
        let (status, body) = get_json(app(provider), "/api/crypto/ethereum-price").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch Ethereum price");
    }

    #[tokio::test]
    async fn test_cache_info_endpoint() {
        let provider = Arc::new(MockProvider::with_eth_price(3000.0, 0.0));
        let service = Arc::new(PriceService::with_provider(
            ServiceConfig::default(),
            provider.clone(),
        ));
        service.get_quote().await.unwrap();

        let (status, body) = get_json(router(service), "/api/crypto/cache-info").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cacheSize"], 1);
        assert_eq!(body["rateLimitInfo"]["currentRequests"], 1);
        assert_eq!(body["rateLimitInfo"]["maxRequests"], 30);
        assert_eq!(body["rateLimitInfo"]["windowMs"], 60_000);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(
            app(MockProvider::with_eth_price(3000.0, 0.0)),
            "/health",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}
