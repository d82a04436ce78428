use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;

use crate::fetch::{FetchError, Fetcher};
use crate::metrics_consts::{CONNECTOR_RESULTS_TOTAL, PROGRAMS_RETURNED_TOTAL};
use crate::parse::{decode_records, Record};
use crate::types::Envelope;

pub mod csv_source;
pub mod discover_uni;
pub mod scorecard;

pub use csv_source::CsvSourceConnector;
pub use discover_uni::DiscoverUniConnector;
pub use scorecard::ScorecardConnector;

/// A validated, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PER_PAGE: u32 = 100;

    /// Returns `None` unless both values are at least 1.
    pub fn new(page: u32, per_page: u32) -> Option<Self> {
        (page >= 1 && per_page >= 1).then_some(PageRequest { page, per_page })
    }

    pub fn offset(&self) -> usize {
        (self.page as usize)
            .saturating_sub(1)
            .saturating_mul(self.per_page as usize)
    }

    /// Slices this page out of the full row set. The flag reports whether rows remain
    /// past the end of the slice.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> (&'a [T], bool) {
        let start = self.offset();
        let end = start.saturating_add(self.per_page as usize);
        let page = rows.get(start.min(rows.len())..end.min(rows.len())).unwrap_or(&[]);
        (page, end < rows.len())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: Self::DEFAULT_PAGE,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// Fetches and normalizes one upstream source. Implementations never fail: problems
/// are reported through the envelope's `meta.error`.
#[async_trait]
pub trait Connector {
    /// Lowercase identifier, also used as the metrics label.
    fn source(&self) -> &str;

    async fn programs(&self, page: PageRequest) -> Envelope;
}

/// Runs a connector and records how it went.
pub async fn run_connector(
    connector: &(dyn Connector + Send + Sync),
    page: PageRequest,
) -> Envelope {
    let envelope = connector.programs(page).await;

    let source = connector.source().to_string();
    match &envelope.meta.error {
        Some(error) => {
            tracing::warn!(source = %source, error = %error, "connector returned no programs");
            counter!(CONNECTOR_RESULTS_TOTAL, "source" => source, "outcome" => "error")
                .increment(1);
        }
        None => {
            counter!(CONNECTOR_RESULTS_TOTAL, "source" => source.clone(), "outcome" => "ok")
                .increment(1);
            counter!(PROGRAMS_RETURNED_TOTAL, "source" => source)
                .increment(envelope.programs.len() as u64);
        }
    }

    envelope
}

/// One page of a CSV feed that was fetched in full.
pub(crate) struct CsvPage {
    pub records: Vec<Record>,
    pub more: bool,
}

pub(crate) async fn fetch_csv_page(
    fetcher: &Arc<dyn Fetcher + Send + Sync>,
    source: &str,
    url: &str,
    page: PageRequest,
) -> Result<CsvPage, FetchError> {
    let body = fetcher.fetch(source, url, &[]).await?;
    let rows = decode_records(&body);
    let (slice, more) = page.slice(&rows);

    Ok(CsvPage {
        records: slice.to_vec(),
        more,
    })
}
