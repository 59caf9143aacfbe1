//! JavaScript-facing façade. Thin: parses arguments, wires the browser
//! adapters into the application layer and hands views out as JSON strings.

use crate::application::{ChartSessionController, DataSourceClient, PricePoller};
use crate::config::PulseConfig;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::Granularity;
use crate::infrastructure::{BinanceRestSource, BrowserClock, JsBackendActor, ProxySource, WasmSpawner};
use crate::presentation::display::PriceDisplay;
use js_sys::Function;
use serde::Serialize;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

const COMPONENT: LogComponent = LogComponent::Presentation("WasmApi");

type BrowserClient = DataSourceClient<BinanceRestSource, ProxySource<JsBackendActor>, BrowserClock>;

fn to_js(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_json(value: &impl Serialize) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(to_js)
}

/// Hands a JSON string to a page callback. Callback exceptions are logged,
/// not propagated into the Rust task.
fn deliver(callback: &Function, value: &impl Serialize) {
    match to_json(value) {
        Ok(json) => {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                log_error!(COMPONENT, "callback threw: {e:?}");
            }
        }
        Err(e) => {
            log_error!(COMPONENT, "failed to serialize view: {e:?}");
        }
    }
}

/// Price panel entry point.
///
/// `actor` is the backend actor used as fallback source; `config_json` is an
/// optional, possibly partial [`PulseConfig`] as JSON.
#[wasm_bindgen]
pub struct PricePulseApi {
    client: Rc<BrowserClient>,
    poller: PricePoller<BrowserClient, BrowserClock>,
    config: PulseConfig,
}

#[wasm_bindgen]
impl PricePulseApi {
    #[wasm_bindgen(constructor)]
    pub fn new(actor: JsValue, config_json: Option<String>) -> Result<PricePulseApi, JsValue> {
        let config = match config_json {
            Some(text) => PulseConfig::from_json(&text).map_err(to_js)?,
            None => PulseConfig::default(),
        };

        let primary = BinanceRestSource::new(config.api_base_url.clone(), config.symbol.clone());
        let fallback = ProxySource::new(JsBackendActor::new(actor));
        let client = Rc::new(DataSourceClient::new(primary, fallback, BrowserClock, &config));
        let poller = PricePoller::new(Rc::clone(&client), BrowserClock, &config);

        log_info!(COMPONENT, "✅ price pulse ready for {}", config.symbol);
        Ok(Self { client, poller, config })
    }

    /// `callback` receives a `PriceDisplay` JSON string after every poll.
    #[wasm_bindgen(js_name = startPolling)]
    pub fn start_polling(&mut self, callback: Function) -> Result<(), JsValue> {
        self.poller
            .start(&WasmSpawner, move |outcome| deliver(&callback, &PriceDisplay::from_outcome(&outcome)))
            .map_err(to_js)
    }

    #[wasm_bindgen(js_name = stopPolling)]
    pub fn stop_polling(&mut self) {
        self.poller.stop();
    }

    #[wasm_bindgen(js_name = isPolling)]
    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// How long the page should highlight a changed price.
    #[wasm_bindgen(js_name = pulseMs)]
    pub fn pulse_ms(&self) -> f64 {
        self.poller.pulse_duration().as_millis() as f64
    }

    /// Last successful price as JSON, or `null`.
    #[wasm_bindgen(js_name = latestPrice)]
    pub fn latest_price(&self) -> Result<String, JsValue> {
        to_json(&self.poller.latest())
    }

    /// Chart panel sharing this instance's data sources.
    #[wasm_bindgen(js_name = chartPanel)]
    pub fn chart_panel(&self) -> ChartPanelApi {
        ChartPanelApi { controller: ChartSessionController::new(Rc::clone(&self.client), WasmSpawner, &self.config) }
    }
}

#[wasm_bindgen]
pub struct ChartPanelApi {
    controller: ChartSessionController<BrowserClient, WasmSpawner>,
}

#[wasm_bindgen]
impl ChartPanelApi {
    pub fn open(&self) {
        self.controller.open();
    }

    pub fn close(&self) {
        self.controller.close();
    }

    /// Accepts `"15m"`, `"1h"` or `"1d"`.
    #[wasm_bindgen(js_name = selectGranularity)]
    pub fn select_granularity(&self, granularity: &str) -> Result<(), JsValue> {
        let granularity = Granularity::from_str(granularity)
            .map_err(|_| to_js(format!("unknown granularity: {granularity}")))?;
        self.controller.select_granularity(granularity);
        Ok(())
    }

    pub fn retry(&self) {
        self.controller.retry();
    }

    /// Current `ChartView` as JSON.
    pub fn view(&self) -> Result<String, JsValue> {
        to_json(&self.controller.view())
    }

    #[wasm_bindgen(js_name = recentSignals)]
    pub fn recent_signals(&self, count: usize) -> Result<String, JsValue> {
        to_json(&self.controller.recent_signals(count))
    }

    /// `callback` receives the `ChartView` JSON after every state change.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) {
        self.controller.subscribe(move |view| deliver(&callback, view));
    }
}
