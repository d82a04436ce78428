use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::connectors::{
    run_connector, Connector, CsvSourceConnector, DiscoverUniConnector, PageRequest,
    ScorecardConnector,
};
use crate::country::{CountrySelector, CsvCountry};
use crate::fetch::Fetcher;
use crate::types::{Envelope, Meta};

pub const UNSUPPORTED_COUNTRY_ERROR: &str = "unsupported_country";

/// Routes a request to its connector(s). Built once at startup; holds no mutable state.
pub struct Dispatcher {
    scorecard: Box<dyn Connector + Send + Sync>,
    discover_uni: Box<dyn Connector + Send + Sync>,
    csv_sources: HashMap<CsvCountry, Box<dyn Connector + Send + Sync>>,
}

impl Dispatcher {
    pub fn new(
        scorecard: Box<dyn Connector + Send + Sync>,
        discover_uni: Box<dyn Connector + Send + Sync>,
        csv_sources: HashMap<CsvCountry, Box<dyn Connector + Send + Sync>>,
    ) -> Self {
        Self {
            scorecard,
            discover_uni,
            csv_sources,
        }
    }

    pub fn from_config(config: &Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        let scorecard = ScorecardConnector::new(
            fetcher.clone(),
            config.scorecard_url.clone(),
            config.data_gov_key().map(str::to_string),
        );
        let discover_uni =
            DiscoverUniConnector::new(fetcher.clone(), config.uk_csv_url().map(str::to_string));

        let csv_sources = CsvCountry::ALL
            .into_iter()
            .map(|country| {
                let connector: Box<dyn Connector + Send + Sync> =
                    Box::new(CsvSourceConnector::new(
                        fetcher.clone(),
                        country,
                        config.csv_source_url(country).map(str::to_string),
                    ));
                (country, connector)
            })
            .collect();

        Self::new(Box::new(scorecard), Box::new(discover_uni), csv_sources)
    }

    pub async fn programs(&self, country: &CountrySelector, page: PageRequest) -> Envelope {
        match country {
            CountrySelector::Us => run_connector(self.scorecard.as_ref(), page).await,
            CountrySelector::Uk => run_connector(self.discover_uni.as_ref(), page).await,
            CountrySelector::Csv(key) => match self.csv_sources.get(key) {
                Some(connector) => run_connector(connector.as_ref(), page).await,
                None => Envelope::failed(Meta::error(UNSUPPORTED_COUNTRY_ERROR)),
            },
            CountrySelector::All => self.combined(page).await,
            CountrySelector::Unsupported(key) => {
                tracing::debug!(country = %key, "request for unsupported country");
                Envelope::failed(Meta::error(UNSUPPORTED_COUNTRY_ERROR))
            }
        }
    }

    /// US and UK side by side. The page metadata of the parts is dropped and the
    /// combined envelope always reports page 1, which is what existing callers expect.
    async fn combined(&self, page: PageRequest) -> Envelope {
        let (us, uk) = tokio::join!(
            run_connector(self.scorecard.as_ref(), page),
            run_connector(self.discover_uni.as_ref(), page),
        );

        let mut programs = us.programs;
        programs.extend(uk.programs);

        Envelope {
            meta: Meta {
                page: Some(1),
                count: Some(programs.len()),
                ..Default::default()
            },
            programs,
        }
    }
}
