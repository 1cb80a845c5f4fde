//! Service configuration
//!
//! Defaults come from `constants`; `ServiceConfig::from_env` overlays
//! environment variables once at startup.

use crate::{
    constants::{
        CACHE_TTL_MINUTES, COINGECKO_API_URL, DEFAULT_ASSET, DEFAULT_PORT, FALLBACK_PRICE_USD,
        INITIAL_BACKOFF_MS, MAX_RETRY_ATTEMPTS, RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_MS,
    },
    retry::RetryPolicy,
    types::{Asset, PriceQuote},
    validation::PriceBounds,
};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Whether the service runs against real users or a developer machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    Production,
    Development,
}

impl OperatingMode {
    /// Only an explicit development value enables development mode
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => OperatingMode::Development,
            _ => OperatingMode::Production,
        }
    }
}

/// What the service does when a live fetch fails
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailurePolicy {
    /// Return the error to the caller
    Propagate,
    /// Log a warning and serve this quote instead
    Fallback(PriceQuote),
}

/// Configuration for [`PriceService`](crate::service::PriceService)
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub asset: Asset,
    pub api_base_url: String,
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
    pub rate_limit_max_requests: usize,
    pub rate_limit_window: Duration,
    pub price_bounds: PriceBounds,
    pub fallback_price: f64,
    pub mode: OperatingMode,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            asset: DEFAULT_ASSET,
            api_base_url: COINGECKO_API_URL.to_string(),
            cache_ttl: Duration::from_secs(CACHE_TTL_MINUTES * 60),
            retry: RetryPolicy::new(MAX_RETRY_ATTEMPTS, INITIAL_BACKOFF_MS),
            rate_limit_max_requests: RATE_LIMIT_MAX_REQUESTS,
            rate_limit_window: Duration::from_millis(RATE_LIMIT_WINDOW_MS),
            price_bounds: PriceBounds::default(),
            fallback_price: FALLBACK_PRICE_USD,
            mode: OperatingMode::Production,
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or unparseable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let lookup = &lookup;

        let asset = lookup("PRICE_ASSET")
            .and_then(|v| Asset::parse(&v))
            .unwrap_or(defaults.asset);

        let api_base_url = lookup("PRICE_API_URL").unwrap_or(defaults.api_base_url);

        let cache_ttl = parsed(lookup, "PRICE_CACHE_TTL_MINUTES")
            .and_then(|minutes: u64| match minutes.checked_mul(60) {
                Some(secs) => Some(Duration::from_secs(secs)),
                None => {
                    tracing::warn!(minutes, "Cache TTL too large, keeping default");
                    None
                }
            })
            .unwrap_or(defaults.cache_ttl);

        let retry = RetryPolicy::new(
            parsed(lookup, "PRICE_RETRY_ATTEMPTS").unwrap_or(defaults.retry.max_attempts),
            parsed(lookup, "PRICE_RETRY_BASE_DELAY_MS").unwrap_or(defaults.retry.base_delay_ms),
        );

        let rate_limit_max_requests = parsed(lookup, "PRICE_RATE_LIMIT_MAX_REQUESTS")
            .unwrap_or(defaults.rate_limit_max_requests);

        let rate_limit_window = parsed(lookup, "PRICE_RATE_LIMIT_WINDOW_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.rate_limit_window);

        let requested_bounds = PriceBounds::new(
            parsed(lookup, "PRICE_MIN_USD").unwrap_or(defaults.price_bounds.min),
            parsed(lookup, "PRICE_MAX_USD").unwrap_or(defaults.price_bounds.max),
        );
        let price_bounds = if requested_bounds.is_valid() {
            requested_bounds
        } else {
            tracing::warn!(
                min = requested_bounds.min,
                max = requested_bounds.max,
                "Invalid price bounds, keeping defaults"
            );
            defaults.price_bounds
        };

        let fallback_price =
            parsed(lookup, "PRICE_FALLBACK_USD").unwrap_or(defaults.fallback_price);

        let mode = lookup("APP_ENV")
            .map(|v| OperatingMode::parse(&v))
            .unwrap_or(defaults.mode);

        let port = parsed(lookup, "PORT").unwrap_or(defaults.port);

        Self {
            asset,
            api_base_url,
            cache_ttl,
            retry,
            rate_limit_max_requests,
            rate_limit_window,
            price_bounds,
            fallback_price,
            mode,
            port,
        }
    }

    /// Production propagates failures; development serves the fallback price
    pub fn failure_policy(&self) -> FailurePolicy {
        match self.mode {
            OperatingMode::Production => FailurePolicy::Propagate,
            OperatingMode::Development => {
                FailurePolicy::Fallback(PriceQuote::price_only(self.fallback_price))
            }
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key)?;
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %value, "Ignoring unparseable configuration value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServiceConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.asset, Asset::ETH);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.retry, RetryPolicy::new(3, 1000));
        assert_eq!(config.rate_limit_max_requests, 30);
        assert_eq!(config.rate_limit_window, Duration::from_secs(60));
        assert_eq!(config.price_bounds, PriceBounds::new(100.0, 50_000.0));
        assert_eq!(config.mode, OperatingMode::Production);
        assert_eq!(config.failure_policy(), FailurePolicy::Propagate);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PRICE_ASSET", "btc"),
            ("PRICE_API_URL", "http://127.0.0.1:8000"),
            ("PRICE_CACHE_TTL_MINUTES", "1"),
            ("PRICE_RETRY_ATTEMPTS", "5"),
            ("PRICE_RETRY_BASE_DELAY_MS", "250"),
            ("PRICE_RATE_LIMIT_MAX_REQUESTS", "10"),
            ("PRICE_RATE_LIMIT_WINDOW_MS", "30000"),
            ("PRICE_MIN_USD", "10000"),
            ("PRICE_MAX_USD", "250000"),
            ("PORT", "8081"),
        ]);

        assert_eq!(config.asset, Asset::BTC);
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.retry, RetryPolicy::new(5, 250));
        assert_eq!(config.rate_limit_max_requests, 10);
        assert_eq!(config.rate_limit_window, Duration::from_secs(30));
        assert_eq!(config.price_bounds, PriceBounds::new(10_000.0, 250_000.0));
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let config = config_from(&[("PRICE_RETRY_ATTEMPTS", "many"), ("PORT", "-1")]);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_oversized_cache_ttl_keeps_default() {
        let config = config_from(&[("PRICE_CACHE_TTL_MINUTES", "18446744073709551615")]);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_invalid_price_bounds_keep_defaults() {
        let defaults = PriceBounds::new(100.0, 50_000.0);

        let nan = config_from(&[("PRICE_MIN_USD", "NaN")]);
        assert_eq!(nan.price_bounds, defaults);

        let inverted = config_from(&[("PRICE_MIN_USD", "60000"), ("PRICE_MAX_USD", "1000")]);
        assert_eq!(inverted.price_bounds, defaults);

        let infinite = config_from(&[("PRICE_MAX_USD", "inf")]);
        assert_eq!(infinite.price_bounds, defaults);
    }

    #[test]
    fn test_development_mode_uses_fallback() {
        let config = config_from(&[("APP_ENV", "development"), ("PRICE_FALLBACK_USD", "2800")]);
        assert_eq!(config.mode, OperatingMode::Development);
        assert_eq!(
            config.failure_policy(),
            FailurePolicy::Fallback(PriceQuote::price_only(2800.0))
        );
    }

    #[test]
    fn test_unknown_mode_is_production() {
        assert_eq!(OperatingMode::parse("test"), OperatingMode::Production);
        assert_eq!(OperatingMode::parse("staging"), OperatingMode::Production);
        assert_eq!(OperatingMode::parse("DEV"), OperatingMode::Development);
    }
}
