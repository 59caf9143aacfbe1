use crate::domain::errors::{NetworkError, SourceError, ValidationError};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Granularity, Symbol, repositories::MarketDataSource};
use gloo_net::http::Request;
use serde_json::Value;
use web_sys::AbortController;

const COMPONENT: LogComponent = LogComponent::Infrastructure("BinanceREST");

/// Primary source: the exchange's public REST API.
///
/// Requests carry an `AbortSignal`; dropping the in-flight future (e.g. when
/// the client's timeout wins the race) aborts the browser fetch.
#[derive(Debug, Clone)]
pub struct BinanceRestSource {
    base_url: String,
    symbol: Symbol,
}

impl Default for BinanceRestSource {
    fn default() -> Self {
        Self::new("https://api.binance.com/api/v3", Symbol::default())
    }
}

impl BinanceRestSource {
    pub fn new(base_url: impl Into<String>, symbol: Symbol) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_string(), symbol }
    }

    pub fn ticker_url(&self) -> String {
        format!("{}/ticker/24hr?symbol={}", self.base_url, self.symbol.value())
    }

    pub fn klines_url(&self, granularity: Granularity, limit: usize) -> String {
        format!(
            "{}/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            self.symbol.value(),
            granularity.to_binance_str(),
            limit
        )
    }

    async fn get_json(&self, url: String) -> Result<Value, SourceError> {
        crate::log_debug!(COMPONENT, "GET {url}");

        let controller = AbortController::new()
            .map_err(|e| NetworkError::Transport(format!("AbortController unavailable: {e:?}")))?;
        let _abort_on_drop = AbortOnDrop(controller.clone());

        let response = Request::get(&url)
            .abort_signal(Some(&controller.signal()))
            .send()
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(NetworkError::Status(response.status()).into());
        }

        let text = response.text().await.map_err(|e| NetworkError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ValidationError::MalformedJson(e.to_string()).into())
    }
}

impl MarketDataSource for BinanceRestSource {
    fn name(&self) -> &'static str {
        "binance-rest"
    }

    async fn ticker(&self) -> Result<Value, SourceError> {
        self.get_json(self.ticker_url()).await
    }

    async fn klines(&self, granularity: Granularity, limit: usize) -> Result<Value, SourceError> {
        self.get_json(self.klines_url(granularity, limit)).await
    }
}

/// Aborts the request unless it already completed (abort is then a no-op).
struct AbortOnDrop(AbortController);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}
