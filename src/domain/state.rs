use serde::Serialize;
use std::rc::Rc;

use crate::domain::market_data::{Candle, Granularity, Signal, services::Projection};

/// Derived artifacts of one successful candle fetch. Never patched in place:
/// a new fetch builds a new snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSnapshot {
    pub granularity: Granularity,
    pub candles: Rc<Vec<Candle>>,
    pub rsi: Rc<Vec<f64>>,
    pub signals: Rc<Vec<Signal>>,
    pub projection: Projection,
}

/// Chart panel lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartState {
    Idle,
    Loading { granularity: Granularity },
    Ready(ChartSnapshot),
    Error { granularity: Granularity, message: String },
}

/// Read model handed to the page: whatever is not backed by the current
/// granularity's completed fetch is empty.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartView {
    pub granularity: Granularity,
    pub candles: Vec<Candle>,
    pub rsi: Vec<f64>,
    pub signals: Vec<Signal>,
    pub projection: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ChartView {
    pub fn from_state(selected: Granularity, state: &ChartState) -> Self {
        let empty = Self {
            granularity: selected,
            candles: Vec::new(),
            rsi: Vec::new(),
            signals: Vec::new(),
            projection: None,
            loading: false,
            error: None,
        };
        match state {
            ChartState::Idle => empty,
            ChartState::Loading { granularity } => Self { granularity: *granularity, loading: true, ..empty },
            ChartState::Error { granularity, message } => {
                Self { granularity: *granularity, error: Some(message.clone()), ..empty }
            }
            ChartState::Ready(snapshot) => Self {
                granularity: snapshot.granularity,
                candles: snapshot.candles.as_ref().clone(),
                rsi: snapshot.rsi.as_ref().clone(),
                signals: snapshot.signals.as_ref().clone(),
                projection: Some(snapshot.projection.to_string()),
                ..empty
            },
        }
    }
}
