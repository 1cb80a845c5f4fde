//! Types for the quote service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported cryptocurrency assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    /// Ethereum
    ETH,
    /// Bitcoin
    BTC,
    /// Solana
    SOL,
}

impl Asset {
    /// Get the asset symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::ETH => "ETH",
            Asset::BTC => "BTC",
            Asset::SOL => "SOL",
        }
    }

    /// Get the CoinGecko ID for this asset
    pub fn coingecko_id(&self) -> &'static str {
        match self {
            Asset::ETH => "ethereum",
            Asset::BTC => "bitcoin",
            Asset::SOL => "solana",
        }
    }

    /// Human readable name, used in HTTP error bodies
    pub fn display_name(&self) -> &'static str {
        match self {
            Asset::ETH => "Ethereum",
            Asset::BTC => "Bitcoin",
            Asset::SOL => "Solana",
        }
    }

    /// Parses a symbol or CoinGecko id, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "eth" | "ethereum" => Some(Asset::ETH),
            "btc" | "bitcoin" => Some(Asset::BTC),
            "sol" | "solana" => Some(Asset::SOL),
            _ => None,
        }
    }
}

/// A validated price quote
///
/// Only built by the validator or as the configured fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Price in USD
    pub price: f64,
    /// 24h price change percentage
    pub change_24h: f64,
    /// 24h traded volume in USD
    pub volume_24h: f64,
    /// Market capitalisation in USD
    pub market_cap: f64,
}

impl PriceQuote {
    /// Quote carrying only a price, auxiliary fields zeroed
    pub fn price_only(price: f64) -> Self {
        Self {
            price,
            change_24h: 0.0,
            volume_24h: 0.0,
            market_cap: 0.0,
        }
    }
}

/// A quote together with the moment it was served
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub price: f64,
    pub change_24h: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
    pub timestamp: DateTime<Utc>,
}

impl MarketSnapshot {
    pub fn new(quote: PriceQuote, timestamp: DateTime<Utc>) -> Self {
        Self {
            price: quote.price,
            change_24h: quote.change_24h,
            volume_24h: quote.volume_24h,
            market_cap: quote.market_cap,
            timestamp,
        }
    }
}

/// Body returned by the polling endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    pub price: f64,
    pub change_24h: f64,
    /// Same value as `change_24h`; the provider already reports a percentage
    pub change_percent_24h: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<MarketSnapshot> for PriceResponse {
    fn from(snapshot: MarketSnapshot) -> Self {
        Self {
            price: snapshot.price,
            change_24h: snapshot.change_24h,
            change_percent_24h: snapshot.change_24h,
            timestamp: snapshot.timestamp,
        }
    }
}

/// Rate limiter usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitInfo {
    pub current_requests: usize,
    pub max_requests: usize,
    pub window_ms: u64,
}

/// Snapshot of the service's shared state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub cache_size: usize,
    pub rate_limit_info: RateLimitInfo,
}
