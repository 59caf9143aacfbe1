//! ICP price pulse: live ticker polling and an on-demand candle chart with
//! RSI, threshold signals and a short-horizon projection, compiled to WASM.
//!
//! Layers follow the usual split: `domain` holds pure market-data logic and
//! the source abstractions, `application` orchestrates fetching, polling and
//! the chart lifecycle, `infrastructure` provides browser adapters and
//! `presentation` is the `wasm_bindgen` surface.

#[macro_use]
mod macros;

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use domain::logging::LogComponent;
use wasm_bindgen::prelude::*;

/// Installs the panic hook, console logger and browser time provider.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let logger = if cfg!(debug_assertions) {
        infrastructure::ConsoleLogger::new_development()
    } else {
        infrastructure::ConsoleLogger::new_production()
    };
    domain::logging::init_logger(Box::new(logger));
    domain::logging::init_time_provider(Box::new(infrastructure::BrowserClock));

    log_info!(LogComponent::Presentation("Initialize"), "🚀 ICP price pulse initialized");
}
