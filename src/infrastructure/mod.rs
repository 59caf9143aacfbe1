pub mod http;
pub mod manual_clock;
pub mod proxy;
pub mod services;

pub use http::BinanceRestSource;
pub use manual_clock::ManualClock;
pub use proxy::{JsBackendActor, ProxySource};
pub use services::{BrowserClock, ConsoleLogger, WasmSpawner};
