use std::sync::Arc;

use anyhow::{Context, Result};
use url::Url;

use crate::config::{source_env_var, Config};
use crate::dispatch::Dispatcher;
use crate::fetch::{Fetcher, HttpFetcher};

#[derive(Clone)]
pub struct State {
    pub dispatcher: Arc<Dispatcher>,
    pub secret: String,
    pub enable_metrics: bool,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config.upstream_timeout())
            .context("Failed to create upstream http client")?;

        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Same as [`State::from_config`] but with a caller-supplied fetcher.
    pub fn with_fetcher(config: &Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        warn_about_configuration(config);

        State {
            dispatcher: Arc::new(Dispatcher::from_config(config, fetcher)),
            secret: config.agg_secret.clone(),
            enable_metrics: config.enable_metrics,
        }
    }
}

fn warn_about_configuration(config: &Config) {
    if config.agg_secret.is_empty() {
        tracing::warn!("AGG_SECRET is not set, every request will be refused with 403");
    }

    if config.data_gov_key().is_none() {
        tracing::warn!("DATA_GOV_KEY is not set, US results will be empty");
    }

    if let Err(e) = Url::parse(&config.scorecard_url) {
        tracing::warn!(
            error = %e,
            url = %config.scorecard_url,
            "SCORECARD_URL is not a valid url"
        );
    }

    let sources = config.configured_sources();
    for (key, url) in &sources {
        if let Err(e) = Url::parse(url) {
            tracing::warn!(
                error = %e,
                country = key,
                env = source_env_var(key).unwrap_or_default(),
                url,
                "csv source url is not valid"
            );
        }
    }
    tracing::info!(
        configured = sources.len(),
        countries = ?sources.iter().map(|(key, _)| *key).collect::<Vec<_>>(),
        "csv sources loaded"
    );
}
