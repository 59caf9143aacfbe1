pub mod chart_session;
pub mod data_source_client;
pub mod price_poller;

pub use chart_session::{CHART_ERROR_MESSAGE, ChartSessionController};
pub use data_source_client::DataSourceClient;
pub use price_poller::{PricePoller, PriceTick};
