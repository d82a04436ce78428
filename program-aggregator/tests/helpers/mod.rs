use std::{
    net::SocketAddr,
    sync::{Arc, Once},
};

use program_aggregator::state::State;
use program_aggregator::test_utils::config_with_sources;
use program_aggregator::{config::Config, server::serve};
use tokio::{net::TcpListener, sync::Notify};

pub const SECRET: &str = "integration-secret";

static TRACING_INIT: Once = Once::new();
pub fn setup_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_writer(tracing_subscriber::fmt::TestWriter::new())
            .init()
    });
}

pub fn test_config() -> Config {
    test_config_with_sources(&[])
}

pub fn test_config_with_sources(sources: &[(&str, &str)]) -> Config {
    let mut config = config_with_sources(sources);
    config.agg_secret = SECRET.to_string();
    config
}

pub struct ServerHandle {
    pub addr: SocketAddr,
    pub shutdown: Arc<Notify>,
}

impl ServerHandle {
    pub async fn for_config(config: Config) -> Self {
        setup_tracing();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let notify = Arc::new(Notify::new());
        let shutdown = notify.clone();

        let state = State::from_config(&config).unwrap();

        tokio::spawn(async move {
            serve(state, listener, async move { notify.notified().await }).await
        });

        Self { addr, shutdown }
    }

    pub fn programs_url(&self, query: &str) -> String {
        format!("http://{}/api/v1/programs?{}", self.addr, query)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown.notify_one()
    }
}
