//! Price quote service
//!
//! Composes the cache, rate limiter, retry and validator into the single
//! entry point the HTTP endpoint (or any other consumer) polls.

use crate::{
    cache::TtlCache,
    config::{FailurePolicy, ServiceConfig},
    constants::QUOTE_CACHE_KEY,
    error::{PriceError, ProviderError},
    provider::QuoteProvider,
    providers::CoinGeckoProvider,
    rate_limiter::RateLimiter,
    retry::{retry_with_backoff, RetryPolicy},
    types::{Asset, CacheInfo, MarketSnapshot, PriceQuote, RateLimitInfo},
    validation::{parse_payload, validate_quote, PriceBounds},
};
use std::sync::Arc;
use std::time::Instant;

/// Fetches, validates and caches the quote for one asset
///
/// The cache and rate limiter are the only shared state. Pass the same
/// instances to several services with [`PriceService::with_components`] to
/// share them; otherwise each service owns fresh ones.
///
/// Overlapping calls that both miss the cache may both reach the provider.
/// The last one to finish wins the cache slot and both callers get a valid
/// quote.
///
/// # Example
/// ```no_run
/// use quote_guard::{PriceService, ServiceConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = PriceService::new(ServiceConfig::default())?;
/// let quote = service.get_quote().await?;
/// println!("ETH: ${:.2} ({:+.2}%)", quote.price, quote.change_24h);
/// # Ok(())
/// # }
/// ```
pub struct PriceService {
    asset: Asset,
    provider: Arc<dyn QuoteProvider>,
    cache: Arc<TtlCache<PriceQuote>>,
    rate_limiter: Arc<RateLimiter>,
    retry_policy: RetryPolicy,
    price_bounds: PriceBounds,
    failure_policy: FailurePolicy,
}

impl PriceService {
    /// Creates a service backed by CoinGecko at `config.api_base_url`
    pub fn new(config: ServiceConfig) -> Result<Self, ProviderError> {
        let provider = Arc::new(CoinGeckoProvider::with_base_url(&config.api_base_url)?);
        Ok(Self::with_provider(config, provider))
    }

    /// Creates a service with a custom provider and fresh cache and limiter
    pub fn with_provider(config: ServiceConfig, provider: Arc<dyn QuoteProvider>) -> Self {
        let cache = Arc::new(TtlCache::new(config.cache_ttl));
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window,
        ));
        Self::with_components(config, provider, cache, rate_limiter)
    }

    /// Creates a service around existing shared state
    pub fn with_components(
        config: ServiceConfig,
        provider: Arc<dyn QuoteProvider>,
        cache: Arc<TtlCache<PriceQuote>>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            asset: config.asset,
            provider,
            cache,
            rate_limiter,
            retry_policy: config.retry,
            price_bounds: config.price_bounds,
            failure_policy: config.failure_policy(),
        }
    }

    /// Replaces the failure policy derived from the operating mode
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Returns the current quote
    ///
    /// A fresh cached quote is returned without touching the network or the
    /// rate limit. Otherwise one rate-limit slot is consumed and the provider
    /// is called with retries; the validated result is cached.
    ///
    /// Under [`FailurePolicy::Fallback`] every failure is replaced by the
    /// fallback quote, which is not cached.
    pub async fn get_quote(&self) -> Result<PriceQuote, PriceError> {
        if let Some(quote) = self.cache.get(QUOTE_CACHE_KEY).await {
            tracing::debug!(asset = self.asset.symbol(), "Quote cache hit");
            return Ok(quote);
        }

        match self.fetch_and_cache().await {
            Ok(quote) => Ok(quote),
            Err(e) => match self.failure_policy {
                FailurePolicy::Propagate => {
                    tracing::error!(
                        asset = self.asset.symbol(),
                        error = %e,
                        "Failed to fetch quote"
                    );
                    Err(e)
                }
                FailurePolicy::Fallback(fallback) => {
                    tracing::warn!(
                        asset = self.asset.symbol(),
                        error = %e,
                        fallback_price = fallback.price,
                        "Failed to fetch quote, serving fallback"
                    );
                    Ok(fallback)
                }
            },
        }
    }

    /// Rate-limit check, fetch with retries, validation and cache store
    async fn fetch_and_cache(&self) -> Result<PriceQuote, PriceError> {
        if !self.rate_limiter.can_make_request().await {
            return Err(PriceError::RateLimitExceeded);
        }

        let start = Instant::now();
        let provider = &self.provider;
        let asset = self.asset;
        let body =
            retry_with_backoff(&self.retry_policy, move || provider.fetch_raw(asset)).await?;

        let raw = parse_payload(&body)?;
        let quote = validate_quote(&raw, self.asset, &self.price_bounds)?;

        self.cache.set(QUOTE_CACHE_KEY, quote).await;

        tracing::info!(
            asset = self.asset.symbol(),
            provider = self.provider.provider_name(),
            price = quote.price,
            latency_ms = start.elapsed().as_millis() as u64,
            "Fetched fresh quote"
        );

        Ok(quote)
    }

    /// Returns only the current price in USD
    pub async fn get_price(&self) -> Result<f64, PriceError> {
        Ok(self.get_quote().await?.price)
    }

    /// Returns the current quote stamped with the time it was served
    pub async fn market_snapshot(&self) -> Result<MarketSnapshot, PriceError> {
        let quote = self.get_quote().await?;
        Ok(MarketSnapshot::new(quote, chrono::Utc::now()))
    }

    /// Empties the cache and resets the rate limiter
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        self.rate_limiter.reset().await;
        tracing::info!(asset = self.asset.symbol(), "Cleared quote cache and rate limiter");
    }

    /// Reports cache size and rate-limit usage
    pub async fn cache_info(&self) -> CacheInfo {
        CacheInfo {
            cache_size: self.cache.size().await,
            rate_limit_info: RateLimitInfo {
                current_requests: self.rate_limiter.current_requests().await,
                max_requests: self.rate_limiter.max_requests(),
                window_ms: self.rate_limiter.window().as_millis() as u64,
            },
        }
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }
}
