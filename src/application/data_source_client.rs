use crate::config::PulseConfig;
use crate::domain::{
    clock::Clock,
    errors::{DataUnavailable, NetworkError, SourceError, ValidationError},
    logging::LogComponent,
    market_data::{
        Candle, Granularity, PricePoint, Timestamp, payload,
        repositories::{CandleFeed, MarketDataSource, TickerFeed},
    },
};
use futures::future::{Either, select};
use serde_json::Value;
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

const COMPONENT: LogComponent = LogComponent::Application("DataSourceClient");

/// Two-step market data access: the primary source, then the fallback
/// source, each bounded by the request timeout and judged by the same
/// payload rules.
///
/// Holds no mutable state, so one instance (behind an `Rc`) serves the
/// poller and the chart session concurrently.
pub struct DataSourceClient<P, F, C> {
    primary: P,
    fallback: F,
    clock: C,
    request_timeout: Duration,
    circulating_supply: f64,
}

impl<P, F, C> DataSourceClient<P, F, C>
where
    P: MarketDataSource,
    F: MarketDataSource,
    C: Clock,
{
    pub fn new(primary: P, fallback: F, clock: C, config: &PulseConfig) -> Self {
        Self {
            primary,
            fallback,
            clock,
            request_timeout: config.request_timeout(),
            circulating_supply: config.circulating_supply,
        }
    }

    /// Request raced against the timeout. Losing the race drops the request
    /// future, which cancels it.
    async fn bounded(
        &self,
        request: impl Future<Output = Result<Value, SourceError>>,
    ) -> Result<Value, SourceError> {
        let request = pin!(request);
        match select(request, self.clock.sleep(self.request_timeout)).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(NetworkError::Timeout(self.request_timeout).into()),
        }
    }

    /// Any primary failure, transport or validation, moves on to the
    /// fallback. Only when that fails too does the caller see an error.
    async fn resolve<T, Fut>(
        &self,
        what: &str,
        primary: impl Future<Output = Result<Value, SourceError>>,
        fallback: impl FnOnce() -> Fut,
        validate: fn(&Value) -> Result<T, ValidationError>,
    ) -> Result<T, DataUnavailable>
    where
        Fut: Future<Output = Result<Value, SourceError>>,
    {
        let accept = |payload: Result<Value, SourceError>| -> Result<T, SourceError> {
            let payload = payload?;
            Ok(validate(&payload)?)
        };

        let primary_error = match accept(self.bounded(primary).await) {
            Ok(value) => {
                log_debug!(COMPONENT, "{what} served by {}", self.primary.name());
                return Ok(value);
            }
            Err(e) => e,
        };

        log_warn!(
            COMPONENT,
            "⚠️ {what} from {} failed ({primary_error}), trying {}",
            self.primary.name(),
            self.fallback.name()
        );

        match accept(self.bounded(fallback()).await) {
            Ok(value) => {
                log_debug!(COMPONENT, "{what} served by {}", self.fallback.name());
                Ok(value)
            }
            Err(fallback_error) => {
                let error = DataUnavailable::new(primary_error, fallback_error);
                log_error!(COMPONENT, "❌ {what}: {error}");
                Err(error)
            }
        }
    }
}

impl<P, F, C> TickerFeed for DataSourceClient<P, F, C>
where
    P: MarketDataSource,
    F: MarketDataSource,
    C: Clock,
{
    async fn fetch_ticker(&self) -> Result<PricePoint, DataUnavailable> {
        let quote = self
            .resolve("ticker", self.primary.ticker(), || self.fallback.ticker(), payload::parse_ticker)
            .await?;
        let observed_at = Timestamp::from_millis(self.clock.now_ms());
        Ok(PricePoint::from_quote(quote, self.circulating_supply, observed_at))
    }
}

impl<P, F, C> CandleFeed for DataSourceClient<P, F, C>
where
    P: MarketDataSource,
    F: MarketDataSource,
    C: Clock,
{
    async fn fetch_candles(&self, granularity: Granularity, count: usize) -> Result<Vec<Candle>, DataUnavailable> {
        self.resolve(
            "klines",
            self.primary.klines(granularity, count),
            || self.fallback.klines(granularity, count),
            payload::parse_klines,
        )
        .await
    }
}
