use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use metrics::{counter, histogram};
use reqwest::Client;
use thiserror::Error;

use crate::metrics_consts::{UPSTREAM_FETCH_DURATION, UPSTREAM_FETCH_TOTAL};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("upstream request failed: {0}")]
    Transport(String),
}

impl FetchError {
    fn label(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::Status(_) => "status",
            FetchError::Transport(_) => "transport",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// The outbound capability connectors use to reach their upstream: one GET, the whole
/// body or a failure. Implementations must bound how long a fetch can take.
#[async_trait]
pub trait Fetcher {
    /// `source` names the connector asking, for logs and metrics.
    async fn fetch(
        &self,
        source: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Bytes, FetchError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("program-aggregator/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    async fn fetch_inner(&self, url: &str, query: &[(&str, String)]) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        source: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Bytes, FetchError> {
        let start = Instant::now();
        let result = self.fetch_inner(url, query).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.label(),
        };
        record_fetch(source, outcome, start.elapsed());

        if let Err(e) = &result {
            tracing::debug!(error = %e, source, url, "upstream fetch failed");
        }

        result
    }
}

fn record_fetch(source: &str, outcome: &'static str, elapsed: Duration) {
    let labels = [("source", source.to_string()), ("outcome", outcome.to_string())];
    counter!(UPSTREAM_FETCH_TOTAL, &labels).increment(1);
    histogram!(UPSTREAM_FETCH_DURATION, &labels).record(elapsed.as_secs_f64());
}
