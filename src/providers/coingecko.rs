//! CoinGecko price provider implementation

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_SIMPLE_PRICE_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT,
    },
    error::ProviderError,
    provider::QuoteProvider,
    types::Asset,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

/// CoinGecko price provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a provider against the public CoinGecko API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a provider against another CoinGecko-compatible base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::Network)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds the CoinGecko API URL for the price, 24h change, volume and market cap
    fn build_url(&self, asset: Asset) -> String {
        format!(
            "{}{}?ids={}&vs_currencies=usd&include_24hr_change=true&include_24hr_vol=true&include_market_cap=true",
            self.base_url,
            COINGECKO_SIMPLE_PRICE_ENDPOINT,
            asset.coingecko_id()
        )
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Network(e)
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    async fn fetch_raw(&self, asset: Asset) -> Result<String, ProviderError> {
        let url = self.build_url(asset);
        let start = Instant::now();
        tracing::debug!(url = %url, "Fetching price from CoinGecko");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http(status.as_u16(), body));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;

        tracing::debug!(
            asset = asset.symbol(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Fetched price payload from CoinGecko"
        );

        Ok(body)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
