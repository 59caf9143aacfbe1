use derive_more::{Constructor, Deref, DerefMut, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - USD price
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, DerefMut, Constructor, Serialize, Deserialize)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Zero is the sentinel of a failed safe-parse and never a real quote.
    pub fn is_usable(&self) -> bool {
        self.0 != 0.0 && self.0.is_finite()
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Two decimals for whole-dollar prices, four below one dollar.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.abs() >= 1.0 { write!(f, "${:.2}", self.0) } else { write!(f, "${:.4}", self.0) }
    }
}

/// Value Object - traded volume
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, DerefMut, Constructor, Serialize, Deserialize)]
pub struct Volume(f64);

impl Volume {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, From, Into, Deref, DerefMut, Constructor, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn from_millis(value: u64) -> Self {
        Self(value)
    }
}

/// Approximate market capitalisation: `price × circulating supply`.
///
/// The supply is a configured constant rather than sourced data, so this
/// drifts from the real figure as the circulating supply changes.
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Constructor, Serialize, Deserialize)]
pub struct MarketCap(f64);

impl MarketCap {
    pub fn approximate(price: Price, circulating_supply: f64) -> Self {
        Self(price.value() * circulating_supply)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Compact dollar notation: `$2.50B`, `$731.20M`, `$12.00K`.
impl fmt::Display for MarketCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        let (scaled, suffix) = match value.abs() {
            v if v >= 1e12 => (value / 1e12, "T"),
            v if v >= 1e9 => (value / 1e9, "B"),
            v if v >= 1e6 => (value / 1e6, "M"),
            v if v >= 1e3 => (value / 1e3, "K"),
            _ => (value, ""),
        };
        write!(f, "${scaled:.2}{suffix}")
    }
}

/// Value Object - exchange symbol
/// Deserialization goes through [`Symbol::new`], so configured symbols are
/// normalised the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: String) -> Result<Self, String> {
        if symbol.trim().is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        Ok(Self(symbol.trim().to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.to_uppercase())
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::from("ICPUSDT")
    }
}

/// Chart granularity selectable in the price panel.
///
/// Each granularity is bound to a fixed candle count, tuned so every view
/// spans roughly one recent day (a month for `Long`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, StrumDisplay, EnumIter, EnumString, AsRefStr, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    Short,

    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    Medium,

    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    Long,
}

impl Granularity {
    /// Binance kline interval string.
    pub fn to_binance_str(&self) -> &str {
        self.as_ref()
    }

    pub fn candle_count(&self) -> usize {
        match self {
            Self::Short => 96,
            Self::Medium => 24,
            Self::Long => 30,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Short => 15 * 60 * 1000,
            Self::Medium => 60 * 60 * 1000,
            Self::Long => 24 * 60 * 60 * 1000,
        }
    }
}
