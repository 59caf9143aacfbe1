//! Runtime configuration injected into the client, poller and chart session.

use crate::domain::errors::ConfigError;
use crate::domain::market_data::Symbol;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub api_base_url: String,
    pub symbol: Symbol,
    /// Supply used for the market-cap approximation.
    pub circulating_supply: f64,
    pub rsi_period: usize,
    pub oversold: f64,
    pub overbought: f64,
    pub projection_window: usize,
    pub projection_horizon: u32,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// Length of the highlight a consumer shows when the price changed.
    pub pulse_ms: u64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.binance.com/api/v3".to_string(),
            symbol: Symbol::default(),
            circulating_supply: 500_000_000.0,
            rsi_period: 14,
            oversold: 30.0,
            overbought: 70.0,
            projection_window: 10,
            projection_horizon: 3,
            poll_interval_ms: 30_000,
            request_timeout_ms: 8_000,
            pulse_ms: 600,
        }
    }
}

impl PulseConfig {
    /// Parse a (possibly partial) JSON object over the defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: &str| Err(ConfigError::Validation(msg.to_string()));

        if self.api_base_url.is_empty() {
            return fail("api_base_url must not be empty");
        }
        if self.symbol.value().is_empty() {
            return fail("symbol must not be empty");
        }
        if !(self.circulating_supply.is_finite() && self.circulating_supply > 0.0) {
            return fail("circulating_supply must be positive");
        }
        if self.rsi_period == 0 {
            return fail("rsi_period must be at least 1");
        }
        if !(0.0..=100.0).contains(&self.oversold)
            || !(0.0..=100.0).contains(&self.overbought)
            || self.oversold >= self.overbought
        {
            return fail("thresholds must satisfy 0 <= oversold < overbought <= 100");
        }
        if self.projection_window < 2 {
            return fail("projection_window must cover at least two candles");
        }
        if self.poll_interval_ms == 0 || self.request_timeout_ms == 0 {
            return fail("poll_interval_ms and request_timeout_ms must be non-zero");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn pulse_duration(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }
}
