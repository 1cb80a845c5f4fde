//! # quote-guard
//!
//! Live price quotes from an external API (CoinGecko) for a dapp front-end,
//! behind a TTL cache, a sliding-window rate limiter, retries with exponential
//! backoff and payload validation.
//!
//! ## Usage
//!
//! ```no_run
//! use quote_guard::{PriceService, ServiceConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = PriceService::new(ServiceConfig::from_env())?;
//!
//! let quote = service.get_quote().await?;
//! println!("ETH: ${:.2}", quote.price);
//!
//! // Served from the cache for the next five minutes
//! let again = service.get_quote().await?;
//! assert_eq!(quote, again);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PriceService::get_quote()
//!     ↓
//! TtlCache (hit → return)
//!     ↓
//! RateLimiter (no budget → RateLimitExceeded)
//!     ↓
//! retry_with_backoff(QuoteProvider::fetch_raw)
//!     ↓
//! validate_quote → TtlCache::set → PriceQuote
//! ```
//!
//! ## Error Handling
//!
//! ```no_run
//! use quote_guard::{PriceError, PriceService};
//!
//! # async fn example(service: PriceService) {
//! match service.get_quote().await {
//!     Ok(quote) => println!("ETH: ${:.2}", quote.price),
//!     Err(PriceError::RateLimitExceeded) => println!("Try again on the next poll"),
//!     Err(PriceError::Validation(e)) => eprintln!("Provider sent bad data: {}", e),
//!     Err(PriceError::Provider(e)) => eprintln!("Provider unreachable: {}", e),
//! }
//! # }
//! ```
//!
//! In development mode (`APP_ENV=development`) failures are replaced by a
//! fixed fallback quote instead.

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod provider;
pub mod providers;
pub mod rate_limiter;
pub mod retry;
pub mod server;
pub mod service;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use cache::TtlCache;
pub use config::{FailurePolicy, OperatingMode, ServiceConfig};
pub use error::{PriceError, ProviderError, ValidationError};
pub use provider::QuoteProvider;
pub use rate_limiter::RateLimiter;
pub use retry::{retry_with_backoff, RetryPolicy};
pub use service::PriceService;
pub use types::{Asset, CacheInfo, MarketSnapshot, PriceQuote, PriceResponse};
pub use validation::{validate_quote, PriceBounds};
