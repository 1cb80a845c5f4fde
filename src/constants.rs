//! Constants for the quote service
//!
//! These are the compile-time defaults. `ServiceConfig::from_env` may override
//! most of them at startup; nothing changes at runtime afterwards.

use crate::types::Asset;

/// Asset tracked when nothing else is configured
pub const DEFAULT_ASSET: Asset = Asset::ETH;

/// How long a validated quote stays fresh in the cache (in minutes)
pub const CACHE_TTL_MINUTES: u64 = 5;

/// Cache key under which the current quote is stored
pub const QUOTE_CACHE_KEY: &str = "price";

/// HTTP request timeout when fetching prices (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum number of attempts per fetch, including the first one
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Delay before the second attempt; doubles for every further attempt (in milliseconds)
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum outbound requests allowed inside one rate-limit window
pub const RATE_LIMIT_MAX_REQUESTS: usize = 30;

/// Length of the sliding rate-limit window (in milliseconds)
pub const RATE_LIMIT_WINDOW_MS: u64 = 60_000;

/// Quote served in development when the live fetch fails
pub const FALLBACK_PRICE_USD: f64 = 3200.0;

/// Lowest plausible ETH price accepted from the provider
pub const ETH_MIN_PRICE_USD: f64 = 100.0;

/// Highest plausible ETH price accepted from the provider
pub const ETH_MAX_PRICE_USD: f64 = 50_000.0;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko API endpoint for simple price queries
pub const COINGECKO_SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "quote-guard/0.1.0";

/// Port the HTTP endpoint listens on by default
pub const DEFAULT_PORT: u16 = 3000;
