#![allow(dead_code)]

use icp_price_pulse::domain::errors::{NetworkError, SourceError};
use icp_price_pulse::domain::market_data::{
    Candle, Granularity, OHLCV, Price, Timestamp, Volume,
    repositories::{BackendActor, MarketDataSource},
};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Scripted answer of a fake source.
#[derive(Clone, Debug)]
pub enum Reply {
    Json(Value),
    Fail(SourceError),
    /// Never resolves.
    Hang,
}

impl Reply {
    pub fn status(code: u16) -> Self {
        Self::Fail(NetworkError::Status(code).into())
    }

    async fn resolve(self) -> Result<Value, SourceError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Fail(error) => Err(error),
            Self::Hang => futures::future::pending().await,
        }
    }
}

/// Source answering from a queue of replies; the last reply repeats.
#[derive(Clone)]
pub struct FakeSource {
    name: &'static str,
    replies: Rc<RefCell<VecDeque<Reply>>>,
    pub klines_calls: Rc<RefCell<Vec<(Granularity, usize)>>>,
    pub ticker_calls: Rc<RefCell<usize>>,
}

impl FakeSource {
    pub fn new(name: &'static str, replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            name,
            replies: Rc::new(RefCell::new(replies.into_iter().collect())),
            klines_calls: Rc::default(),
            ticker_calls: Rc::default(),
        }
    }

    pub fn push(&self, reply: Reply) {
        self.replies.borrow_mut().push_back(reply);
    }

    fn next_reply(&self) -> Reply {
        let mut replies = self.replies.borrow_mut();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap_or(Reply::Hang)
        }
    }
}

impl MarketDataSource for FakeSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn ticker(&self) -> Result<Value, SourceError> {
        *self.ticker_calls.borrow_mut() += 1;
        self.next_reply().resolve().await
    }

    async fn klines(&self, granularity: Granularity, limit: usize) -> Result<Value, SourceError> {
        self.klines_calls.borrow_mut().push((granularity, limit));
        self.next_reply().resolve().await
    }
}

/// Backend actor returning fixed strings or RPC failures. With `hang` set,
/// calls never answer.
#[derive(Clone, Default)]
pub struct FakeActor {
    pub price: Option<String>,
    pub klines: Option<String>,
    pub hang: bool,
    pub calls: Rc<RefCell<usize>>,
}

impl FakeActor {
    pub fn unresponsive() -> Self {
        Self { hang: true, ..Self::default() }
    }

    async fn answer(&self, reply: &Option<String>) -> Result<String, NetworkError> {
        *self.calls.borrow_mut() += 1;
        if self.hang {
            futures::future::pending::<()>().await;
        }
        reply.clone().ok_or_else(|| NetworkError::Rpc("canister rejected".into()))
    }
}

impl BackendActor for FakeActor {
    async fn proxy_icp_price(&self) -> Result<String, NetworkError> {
        self.answer(&self.price).await
    }

    async fn proxy_icp_klines(&self) -> Result<String, NetworkError> {
        self.answer(&self.klines).await
    }
}

pub fn ticker_json(last_price: &str, change: &str) -> Value {
    json!({ "symbol": "ICPUSDT", "lastPrice": last_price, "priceChangePercent": change })
}

/// Kline rows with the given closes, one minute apart.
pub fn klines_json(closes: &[f64]) -> Value {
    Value::Array(
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                let c = close.to_string();
                json!([i as u64 * 60_000, c, c, c, c, "100.0", i as u64 * 60_000 + 59_999])
            })
            .collect(),
    )
}

pub fn make_candle(ts: u64, close: f64) -> Candle {
    let p = Price::from(close);
    Candle::new(Timestamp::from_millis(ts), OHLCV::new(p, p, p, p, Volume::from(1.0)))
}
