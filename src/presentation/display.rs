//! Text shown in the price panel.

use crate::application::PriceTick;
use crate::domain::errors::DataUnavailable;
use serde::Serialize;

pub const PRICE_UNAVAILABLE: &str = "Price unavailable";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDisplay {
    pub price: String,
    pub change_24h: Option<String>,
    pub market_cap: Option<String>,
    /// 24h change is zero or positive
    pub rising: bool,
    /// Price moved since the previous poll; the page flashes the value.
    pub highlight: bool,
    pub available: bool,
}

impl PriceDisplay {
    pub fn from_tick(tick: &PriceTick) -> Self {
        let change = tick.point.change_24h_percent;
        Self {
            price: tick.point.price.to_string(),
            change_24h: Some(format!("{change:+.2}%")),
            market_cap: Some(tick.point.market_cap_approx.to_string()),
            rising: change >= 0.0,
            highlight: tick.changed,
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            price: PRICE_UNAVAILABLE.to_string(),
            change_24h: None,
            market_cap: None,
            rising: false,
            highlight: false,
            available: false,
        }
    }

    pub fn from_outcome(outcome: &Result<PriceTick, DataUnavailable>) -> Self {
        match outcome {
            Ok(tick) => Self::from_tick(tick),
            Err(_) => Self::unavailable(),
        }
    }
}
