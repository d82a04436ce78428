use std::sync::Arc;

use async_trait::async_trait;

use super::{fetch_csv_page, Connector, PageRequest};
use crate::fetch::Fetcher;
use crate::parse::{resolve, Record};
use crate::types::{CanonicalProgram, Envelope, Meta, ALL_DEGREE_LEVELS};

pub const SOURCE: &str = "discoveruni";
pub const NOT_CONFIGURED_ERROR: &str = "no_uk_csv_configured";
pub const FETCH_FAILED_ERROR: &str = "discoveruni_fetch_failed";

const NAME_KEYS: &[&str] = &["name", "institution", "country"];
const INSTITUTION_KEYS: &[&str] = &["name", "institution"];
const CITY_KEYS: &[&str] = &["city"];
const SOURCE_ID_KEYS: &[&str] = &["ukprn", "id"];

const PLACEHOLDER_NAME: &str = "UK Institution";

/// DiscoverUni all-institutions export: a fixed, institution-level CSV schema.
pub struct DiscoverUniConnector {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    csv_url: Option<String>,
}

impl DiscoverUniConnector {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>, csv_url: Option<String>) -> Self {
        Self { fetcher, csv_url }
    }
}

#[async_trait]
impl Connector for DiscoverUniConnector {
    fn source(&self) -> &str {
        SOURCE
    }

    async fn programs(&self, page: PageRequest) -> Envelope {
        let Some(url) = self.csv_url.as_deref() else {
            return Envelope::failed(Meta::error(NOT_CONFIGURED_ERROR));
        };

        match fetch_csv_page(&self.fetcher, SOURCE, url, page).await {
            Ok(csv_page) => {
                let programs: Vec<CanonicalProgram> =
                    csv_page.records.iter().map(to_program).collect();
                Envelope {
                    meta: Meta::page(page.page, programs.len(), csv_page.more),
                    programs,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, url, "failed to fetch uk csv");
                Envelope::failed(Meta::error(FETCH_FAILED_ERROR))
            }
        }
    }
}

fn to_program(record: &Record) -> CanonicalProgram {
    CanonicalProgram {
        name: resolve(record, NAME_KEYS)
            .unwrap_or(PLACEHOLDER_NAME)
            .to_string(),
        institution: resolve(record, INSTITUTION_KEYS).map(str::to_string),
        degree_level: ALL_DEGREE_LEVELS.to_string(),
        tuition_amount: None,
        tuition_currency: Some("GBP".to_string()),
        country: "GB".to_string(),
        city: resolve(record, CITY_KEYS).unwrap_or_default().to_string(),
        source: SOURCE.to_string(),
        source_id: resolve(record, SOURCE_ID_KEYS)
            .unwrap_or_default()
            .to_string(),
    }
}
