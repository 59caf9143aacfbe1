//! Error taxonomy for market-data fetching.
//!
//! Sources fail with [`SourceError`]; the client recovers those locally by
//! trying the fallback path and only ever hands [`DataUnavailable`] to callers.

use std::time::Duration;
use thiserror::Error;

/// Transport-level failure on either source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("proxy call failed: {0}")]
    Rpc(String),
}

/// A response arrived but failed the sanity checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("price is zero or unparsable")]
    ZeroPrice,
    #[error("candle payload is not an array")]
    NotAnArray,
    #[error("candle payload is empty")]
    EmptyCandles,
    #[error("candle {index} has a zero close")]
    ZeroClose { index: usize },
    #[error("candle {index} is not a [time, open, high, low, close, volume] row")]
    MalformedRow { index: usize },
    #[error("payload is not valid JSON: {0}")]
    MalformedJson(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Both the primary and the fallback path were exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("market data unavailable: {}", pick_cause(.primary, .fallback))]
pub struct DataUnavailable {
    pub primary: SourceError,
    pub fallback: SourceError,
}

impl DataUnavailable {
    pub fn new(primary: SourceError, fallback: SourceError) -> Self {
        Self { primary, fallback }
    }

    /// The most informative underlying failure: the fallback error, unless it
    /// only repeats what the primary already reported.
    pub fn cause(&self) -> &SourceError {
        pick_cause(&self.primary, &self.fallback)
    }
}

fn pick_cause<'a>(primary: &'a SourceError, fallback: &'a SourceError) -> &'a SourceError {
    if fallback == primary { primary } else { fallback }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Validation(String),
}
