use crate::domain::market_data::{Candle, Price, Signal, SignalKind};
use serde::Serialize;
use std::fmt;

/// Detects RSI crossings out of the oversold and overbought zones
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalDetector {
    oversold: f64,
    overbought: f64,
}

impl Default for SignalDetector {
    fn default() -> Self {
        Self::new(30.0, 70.0)
    }
}

impl SignalDetector {
    pub fn new(oversold: f64, overbought: f64) -> Self {
        Self { oversold, overbought }
    }

    /// Buy when RSI climbs back to the oversold threshold, sell when it falls
    /// back to the overbought one. Signals come out in ascending time order.
    pub fn detect(&self, candles: &[Candle], rsi: &[f64]) -> Vec<Signal> {
        let len = candles.len().min(rsi.len());
        (1..len)
            .filter_map(|i| {
                let (previous, current) = (rsi[i - 1], rsi[i]);
                let kind = if previous < self.oversold && current >= self.oversold {
                    SignalKind::Buy
                } else if previous > self.overbought && current <= self.overbought {
                    SignalKind::Sell
                } else {
                    return None;
                };
                let candle = &candles[i];
                Some(Signal { time: candle.timestamp, kind, price: candle.ohlcv.close })
            })
            .collect()
    }
}

/// Last `count` signals, most recent first.
pub fn recent_signals(signals: &[Signal], count: usize) -> Vec<Signal> {
    signals.iter().rev().take(count).copied().collect()
}

/// Direction of the naive trend projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "trend", rename_all = "lowercase")]
pub enum Projection {
    Bullish { projected: Price },
    Bearish { projected: Price },
    Sideways,
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bullish { projected } => write!(f, "Bullish: projected {projected}"),
            Self::Bearish { projected } => write!(f, "Bearish: projected {projected}"),
            Self::Sideways => write!(f, "Sideways: no clear trend"),
        }
    }
}

/// Linear extrapolation of the recent mean close-to-close delta.
///
/// A presentation heuristic, not a forecast: `last_close + mean_delta × horizon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionEstimator {
    window: usize,
    horizon: u32,
}

impl Default for ProjectionEstimator {
    fn default() -> Self {
        Self::new(10, 3)
    }
}

impl ProjectionEstimator {
    pub fn new(window: usize, horizon: u32) -> Self {
        Self { window, horizon }
    }

    pub fn project(&self, candles: &[Candle]) -> Projection {
        let recent = &candles[candles.len().saturating_sub(self.window)..];
        let Some(last) = recent.last() else {
            return Projection::Sideways;
        };
        if recent.len() < 2 {
            return Projection::Sideways;
        }

        let deltas = recent.windows(2).map(|pair| pair[1].close() - pair[0].close());
        let avg_delta = deltas.sum::<f64>() / (recent.len() - 1) as f64;
        let projected = Price::from(last.close() + avg_delta * self.horizon as f64);

        if avg_delta > 0.0 {
            Projection::Bullish { projected }
        } else if avg_delta < 0.0 {
            Projection::Bearish { projected }
        } else {
            Projection::Sideways
        }
    }
}
