pub use super::value_objects::{MarketCap, Price, Timestamp, Volume};
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;

/// Value Object - OHLCV data of one candle
#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct OHLCV {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

/// Domain entity - Candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: Timestamp,
    pub ohlcv: OHLCV,
}

impl Candle {
    pub fn new(timestamp: Timestamp, ohlcv: OHLCV) -> Self {
        Self { timestamp, ohlcv }
    }

    pub fn close(&self) -> f64 {
        self.ohlcv.close.value()
    }
}

/// Validated ticker fields as delivered by either data source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickerQuote {
    pub price: Price,
    pub change_24h_percent: f64,
}

/// Spot price snapshot shown in the price panel. Replaced wholesale on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: Price,
    pub change_24h_percent: f64,
    pub market_cap_approx: MarketCap,
    pub observed_at: Timestamp,
}

impl PricePoint {
    pub fn from_quote(quote: TickerQuote, circulating_supply: f64, observed_at: Timestamp) -> Self {
        Self {
            price: quote.price,
            change_24h_percent: quote.change_24h_percent,
            market_cap_approx: MarketCap::approximate(quote.price, circulating_supply),
            observed_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, Serialize, Deserialize)]
pub enum SignalKind {
    #[strum(serialize = "BUY")]
    Buy,
    #[strum(serialize = "SELL")]
    Sell,
}

/// RSI threshold crossing at a given candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub time: Timestamp,
    pub kind: SignalKind,
    pub price: Price,
}
