use crate::domain::errors::{DataUnavailable, NetworkError, SourceError};
use crate::domain::market_data::{Candle, Granularity, PricePoint};
use serde_json::Value;
use std::future::Future;
use std::rc::Rc;

/// One raw market-data source. Returns the decoded JSON payload; validation
/// happens in the client so both sources are judged by the same rules.
pub trait MarketDataSource {
    fn name(&self) -> &'static str;

    fn ticker(&self) -> impl Future<Output = Result<Value, SourceError>>;

    /// Candle rows for `granularity`. Sources that cannot parameterise the
    /// request (the proxy) may ignore both arguments.
    fn klines(&self, granularity: Granularity, limit: usize) -> impl Future<Output = Result<Value, SourceError>>;
}

/// Backend actor reachable over RPC, used as the fallback path.
/// Both methods return a JSON string shaped like the exchange responses.
pub trait BackendActor {
    fn proxy_icp_price(&self) -> impl Future<Output = Result<String, NetworkError>>;

    fn proxy_icp_klines(&self) -> impl Future<Output = Result<String, NetworkError>>;
}

/// Spot price feed consumed by the poller
pub trait TickerFeed {
    fn fetch_ticker(&self) -> impl Future<Output = Result<PricePoint, DataUnavailable>>;
}

/// Candle feed consumed by the chart session
pub trait CandleFeed {
    fn fetch_candles(
        &self,
        granularity: Granularity,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Candle>, DataUnavailable>>;
}

impl<T: TickerFeed> TickerFeed for Rc<T> {
    fn fetch_ticker(&self) -> impl Future<Output = Result<PricePoint, DataUnavailable>> {
        (**self).fetch_ticker()
    }
}

impl<T: CandleFeed> CandleFeed for Rc<T> {
    fn fetch_candles(
        &self,
        granularity: Granularity,
        count: usize,
    ) -> impl Future<Output = Result<Vec<Candle>, DataUnavailable>> {
        (**self).fetch_candles(granularity, count)
    }
}
