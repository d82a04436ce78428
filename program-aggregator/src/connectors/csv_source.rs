use std::sync::Arc;

use async_trait::async_trait;

use super::{fetch_csv_page, Connector, PageRequest};
use crate::country::CsvCountry;
use crate::fetch::Fetcher;
use crate::parse::{resolve, resolve_number, Record};
use crate::types::{
    various_programs_name, CanonicalProgram, Envelope, Meta, ALL_DEGREE_LEVELS,
};

// Column vocabularies seen across national feeds, most specific first.
const NAME_KEYS: &[&str] = &[
    "program_name",
    "name",
    "course",
    "title",
    "institution",
    "school",
];
const INSTITUTION_KEYS: &[&str] = &["institution", "school", "provider"];
const DEGREE_LEVEL_KEYS: &[&str] = &["degree_level", "level", "degree"];
const TUITION_KEYS: &[&str] = &["tuition", "tuition_amount", "tuition_fee", "fees"];
const CURRENCY_KEYS: &[&str] = &["tuition_currency", "currency"];
const COUNTRY_KEYS: &[&str] = &["country"];
const CITY_KEYS: &[&str] = &["city", "town", "location"];
const SOURCE_ID_KEYS: &[&str] = &["id", "ukprn", "program_id", "code"];

/// A per-country CSV feed with an unknown schema. Every field is a best guess.
pub struct CsvSourceConnector {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    country: CsvCountry,
    csv_url: Option<String>,
    source: String,
}

impl CsvSourceConnector {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        country: CsvCountry,
        csv_url: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            country,
            csv_url,
            source: country.key().to_ascii_lowercase(),
        }
    }

    pub fn country(&self) -> CsvCountry {
        self.country
    }

    fn not_configured_error(&self) -> String {
        format!("no_{}_csv_configured", self.source)
    }

    fn fetch_failed_error(&self) -> String {
        format!("{}_fetch_failed", self.country.key())
    }

    fn to_program(&self, record: &Record) -> CanonicalProgram {
        let institution = resolve(record, INSTITUTION_KEYS);
        let name = match resolve(record, NAME_KEYS) {
            Some(name) => name.to_string(),
            None => various_programs_name(institution),
        };

        CanonicalProgram {
            name,
            institution: institution.map(str::to_string),
            degree_level: resolve(record, DEGREE_LEVEL_KEYS)
                .unwrap_or(ALL_DEGREE_LEVELS)
                .to_string(),
            tuition_amount: resolve_number(record, TUITION_KEYS),
            tuition_currency: resolve(record, CURRENCY_KEYS).map(str::to_string),
            country: resolve(record, COUNTRY_KEYS)
                .unwrap_or(self.country.fallback_code())
                .to_string(),
            city: resolve(record, CITY_KEYS).unwrap_or_default().to_string(),
            source: self.source.clone(),
            source_id: resolve(record, SOURCE_ID_KEYS)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

#[async_trait]
impl Connector for CsvSourceConnector {
    fn source(&self) -> &str {
        &self.source
    }

    async fn programs(&self, page: PageRequest) -> Envelope {
        let Some(url) = self.csv_url.as_deref() else {
            return Envelope::failed(Meta::error(self.not_configured_error()));
        };

        match fetch_csv_page(&self.fetcher, &self.source, url, page).await {
            Ok(csv_page) => {
                let programs: Vec<CanonicalProgram> = csv_page
                    .records
                    .iter()
                    .map(|record| self.to_program(record))
                    .collect();
                Envelope {
                    meta: Meta::page(page.page, programs.len(), csv_page.more),
                    programs,
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    url,
                    country = self.country.key(),
                    "failed to fetch csv source"
                );
                Envelope::failed(Meta::error(self.fetch_failed_error()))
            }
        }
    }
}
