//! Error types for the quote service

use thiserror::Error;

/// Errors that can occur when fetching a raw payload from a provider
///
/// Every variant is treated as transient and retried with backoff.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network request failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// Provider answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport failure that did not originate in the HTTP client
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Creates an Http error from a status code and the response body
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}

/// Errors raised while checking a raw provider payload
///
/// These are structural; retrying the same request will not fix them.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Body could not be parsed as JSON at all
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Top-level payload is not a JSON object
    #[error("Invalid response from price API: payload is not an object")]
    NotAnObject,

    /// Payload has no object for the tracked asset
    #[error("Data for {asset} not found in response")]
    MissingAsset { asset: String },

    /// `usd` field is missing, not a number, or not positive
    #[error("Invalid price in response")]
    InvalidPrice,

    /// Price lies outside the configured sanity bounds
    #[error("Price {price} outside expected range [{min}, {max}]")]
    OutOfRange { price: f64, min: f64, max: f64 },
}

impl ValidationError {
    /// Creates a MissingAsset error
    pub fn missing_asset(asset: &str) -> Self {
        Self::MissingAsset {
            asset: asset.to_string(),
        }
    }
}

/// Errors returned by the price service
#[derive(Debug, Error)]
pub enum PriceError {
    /// Payload failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Local request budget exhausted before any network call
    #[error("Rate limit exceeded, try again in a moment")]
    RateLimitExceeded,

    /// Provider fetch failed after all retry attempts
    #[error("Provider failure: {0}")]
    Provider(#[from] ProviderError),
}
