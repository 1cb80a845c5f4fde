//! Provider abstraction for fetching raw quote payloads from external APIs

use crate::{error::ProviderError, types::Asset};
use async_trait::async_trait;

/// Trait for quote providers
///
/// A provider performs one HTTP round trip and hands back the response body
/// untouched. Parsing and validation happen in the service, outside the
/// retry loop, so a structurally bad body is never retried.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches the raw payload describing `asset`
    ///
    /// # Returns
    /// The response body, or an error for transport failures and non-success
    /// statuses (with the body text embedded for diagnostics)
    async fn fetch_raw(&self, asset: Asset) -> Result<String, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted outcome of one mock fetch
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        Body(String),
        Status(u16, String),
        Transport(String),
    }

    impl MockResponse {
        fn into_result(self) -> Result<String, ProviderError> {
            match self {
                MockResponse::Body(body) => Ok(body),
                MockResponse::Status(status, body) => Err(ProviderError::http(status, body)),
                MockResponse::Transport(msg) => Err(ProviderError::transport(msg)),
            }
        }
    }

    /// Mock provider for testing
    ///
    /// Plays queued responses in order, then repeats the default response.
    pub struct MockProvider {
        queue: Arc<Mutex<VecDeque<MockResponse>>>,
        default: Arc<Mutex<MockResponse>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self {
                queue: Arc::new(Mutex::new(VecDeque::new())),
                default: Arc::new(Mutex::new(MockResponse::Transport(
                    "no response configured".to_string(),
                ))),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        /// Answers every call with a CoinGecko payload for ETH
        pub fn with_eth_price(price_usd: f64, change_24h: f64) -> Self {
            let provider = Self::new();
            provider.set_default(MockResponse::Body(eth_payload(price_usd, change_24h)));
            provider
        }

        /// Answers every call with `response`
        pub fn failing(response: MockResponse) -> Self {
            let provider = Self::new();
            provider.set_default(response);
            provider
        }

        pub fn set_default(&self, response: MockResponse) {
            *self.default.lock().unwrap() = response;
        }

        pub fn push(&self, response: MockResponse) {
            self.queue.lock().unwrap().push_back(response);
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    /// Builds a `simple/price` body for ETH
    pub fn eth_payload(price_usd: f64, change_24h: f64) -> String {
        serde_json::json!({
            "ethereum": {
                "usd": price_usd,
                "usd_24h_change": change_24h,
                "usd_24h_vol": 12_000_000_000.0,
                "usd_market_cap": 380_000_000_000.0
            }
        })
        .to_string()
    }

    #[async_trait]
    impl QuoteProvider for MockProvider {
        async fn fetch_raw(&self, _asset: Asset) -> Result<String, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            let next = self.queue.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.default.lock().unwrap().clone()).into_result()
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
