pub mod display;
pub mod wasm_api;

pub use display::{PRICE_UNAVAILABLE, PriceDisplay};
pub use wasm_api::{ChartPanelApi, PricePulseApi};
