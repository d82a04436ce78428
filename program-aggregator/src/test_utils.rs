use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use bytes::Bytes;

use envconfig::Envconfig;

use crate::config::{source_env_var, Config};
use crate::fetch::{FetchError, Fetcher};

/// In-memory [`Fetcher`] keyed by URL. Unknown URLs fail with a transport error.
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Result<Bytes, FetchError>>,
    calls: AtomicUsize,
    last_query: Mutex<Vec<(String, String)>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: impl Into<Bytes>) -> Self {
        self.responses.insert(url.to_string(), Ok(body.into()));
        self
    }

    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Vec<(String, String)> {
        self.last_query
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn fetch(
        &self,
        _source: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Bytes, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_query.lock() {
            *last = query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect();
        }

        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(FetchError::Transport(format!("no response for {url}"))))
    }
}

/// Builds a CSV payload with `rows` numbered rows under a `name,city,id` header.
pub fn numbered_csv(rows: usize) -> String {
    let mut csv = String::from("name,city,id\n");
    for i in 0..rows {
        csv.push_str(&format!("Institution {i},City {i},{i}\n"));
    }
    csv
}

/// Test config with the given `(key, url)` feeds, loaded through the same env vars as
/// production. Unknown keys are ignored.
pub fn config_with_sources(sources: &[(&str, &str)]) -> Config {
    let env: HashMap<String, String> = sources
        .iter()
        .filter_map(|(key, url)| {
            source_env_var(key).map(|var| (var.to_string(), url.to_string()))
        })
        .collect();
    let config = Config::init_from_hashmap(&env).unwrap();
    let defaults = Config::default_for_test();

    Config {
        host: defaults.host,
        port: defaults.port,
        agg_secret: defaults.agg_secret,
        scorecard_url: defaults.scorecard_url,
        upstream_timeout_secs: defaults.upstream_timeout_secs,
        ..config
    }
}
