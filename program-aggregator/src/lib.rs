pub mod api;
pub mod config;
pub mod connectors;
pub mod country;
pub mod dispatch;
pub mod fetch;
pub mod http_metrics;
pub mod metrics_consts;
pub mod parse;
pub mod router;
pub mod server;
pub mod state;
pub mod test_utils;
pub mod types;
