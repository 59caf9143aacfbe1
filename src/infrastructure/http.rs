//! HTTP sources.

pub mod binance_rest_client;

pub use binance_rest_client::BinanceRestSource;
