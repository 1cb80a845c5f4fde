//! Validation of raw provider payloads
//!
//! A payload is only turned into a [`PriceQuote`] after its shape and price
//! range have been checked. The range is a sanity fence against corrupt or
//! zeroed provider data and belongs to the deployment's configuration.

use crate::{
    constants::{ETH_MAX_PRICE_USD, ETH_MIN_PRICE_USD},
    error::ValidationError,
    types::{Asset, PriceQuote},
};
use serde_json::Value;

/// Inclusive range of prices accepted from the provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

impl PriceBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Finite, non-negative and ordered
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min <= self.max
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceBounds {
    /// Bounds for the Ethereum deployment
    fn default() -> Self {
        Self::new(ETH_MIN_PRICE_USD, ETH_MAX_PRICE_USD)
    }
}

/// Parses a provider response body into JSON
pub fn parse_payload(body: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(body).map_err(|e| ValidationError::MalformedPayload(e.to_string()))
}

/// Checks a CoinGecko `simple/price` payload and builds the quote for `asset`
///
/// `usd` must be a positive number inside `bounds`. The 24h change, volume and
/// market cap are informational and default to 0 when missing.
pub fn validate_quote(
    raw: &Value,
    asset: Asset,
    bounds: &PriceBounds,
) -> Result<PriceQuote, ValidationError> {
    let payload = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    let data = payload
        .get(asset.coingecko_id())
        .and_then(Value::as_object)
        .ok_or_else(|| ValidationError::missing_asset(asset.symbol()))?;

    let price = data
        .get("usd")
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or(ValidationError::InvalidPrice)?;

    if !bounds.contains(price) {
        return Err(ValidationError::OutOfRange {
            price,
            min: bounds.min,
            max: bounds.max,
        });
    }

    let field = |name: &str| data.get(name).and_then(Value::as_f64).unwrap_or(0.0);

    Ok(PriceQuote {
        price,
        change_24h: field("usd_24h_change"),
        volume_24h: field("usd_24h_vol"),
        market_cap: field("usd_market_cap"),
    })
}
