use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Connector, PageRequest};
use crate::fetch::Fetcher;
use crate::parse::{lookup_id, lookup_number, lookup_str};
use crate::types::{
    various_programs_name, CanonicalProgram, Envelope, Meta, ALL_DEGREE_LEVELS,
};

pub const SOURCE: &str = "scorecard";
pub const NO_KEY_ERROR: &str = "no_data_gov_key";
pub const FETCH_FAILED_ERROR: &str = "scorecard_fetch_failed";

const FIELD_ID: &str = "id";
const FIELD_NAME: &str = "school.name";
const FIELD_CITY: &str = "school.city";
const FIELD_STATE: &str = "school.state";
const FIELD_TUITION_OUT_OF_STATE: &str = "latest.cost.tuition.out_of_state";
const FIELD_TUITION_IN_STATE: &str = "latest.cost.tuition.in_state";

const PROJECTION: &[&str] = &[
    FIELD_ID,
    FIELD_NAME,
    FIELD_CITY,
    FIELD_STATE,
    FIELD_TUITION_OUT_OF_STATE,
    FIELD_TUITION_IN_STATE,
];

/// US College Scorecard. The API is institution-level, so each school becomes one
/// "various programs" entry.
pub struct ScorecardConnector {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    base_url: String,
    api_key: Option<String>,
}

impl ScorecardConnector {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        base_url: String,
        api_key: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url,
            api_key,
        }
    }

    fn query(api_key: &str, page: PageRequest) -> Vec<(&'static str, String)> {
        vec![
            ("api_key", api_key.to_string()),
            ("fields", PROJECTION.join(",")),
            ("per_page", page.per_page.to_string()),
            // Scorecard pages are zero-based
            ("page", page.page.saturating_sub(1).to_string()),
        ]
    }
}

#[async_trait]
impl Connector for ScorecardConnector {
    fn source(&self) -> &str {
        SOURCE
    }

    async fn programs(&self, page: PageRequest) -> Envelope {
        let Some(api_key) = self.api_key.as_deref() else {
            return Envelope::failed(Meta::error(NO_KEY_ERROR));
        };

        let body = match self
            .fetcher
            .fetch(SOURCE, &self.base_url, &Self::query(api_key, page))
            .await
        {
            Ok(body) => body,
            Err(e) => {
                return Envelope::failed(Meta::error_with_raw(
                    FETCH_FAILED_ERROR,
                    json!({ "_error": e.to_string() }),
                ))
            }
        };

        let payload: Value = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                return Envelope::failed(Meta::error_with_raw(
                    FETCH_FAILED_ERROR,
                    json!({ "_error": format!("invalid json from upstream: {e}") }),
                ))
            }
        };

        let Some(results) = payload.get("results").and_then(Value::as_array) else {
            return Envelope::failed(Meta::error_with_raw(FETCH_FAILED_ERROR, payload));
        };

        let programs: Vec<CanonicalProgram> = results.iter().map(to_program).collect();
        let more = programs.len() == page.per_page as usize;

        Envelope {
            meta: Meta::page(page.page, programs.len(), more),
            programs,
        }
    }
}

fn to_program(item: &Value) -> CanonicalProgram {
    let institution = lookup_str(item, FIELD_NAME);
    let tuition = lookup_number(item, FIELD_TUITION_OUT_OF_STATE)
        .or_else(|| lookup_number(item, FIELD_TUITION_IN_STATE));

    CanonicalProgram {
        name: various_programs_name(institution),
        institution: institution.map(str::to_string),
        degree_level: ALL_DEGREE_LEVELS.to_string(),
        tuition_amount: tuition,
        tuition_currency: Some("USD".to_string()),
        country: "US".to_string(),
        city: lookup_str(item, FIELD_CITY).unwrap_or_default().to_string(),
        source: SOURCE.to_string(),
        source_id: lookup_id(item, FIELD_ID).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::test_utils::StaticFetcher;

    const URL: &str = "https://scorecard.test/schools.json";

    fn connector(fetcher: StaticFetcher, key: Option<&str>) -> ScorecardConnector {
        ScorecardConnector::new(Arc::new(fetcher), URL.to_string(), key.map(str::to_string))
    }

    #[tokio::test]
    async fn test_missing_key_is_a_soft_error() {
        let fetcher = Arc::new(StaticFetcher::new());
        let scorecard = ScorecardConnector::new(fetcher.clone(), URL.to_string(), None);

        let envelope = scorecard.programs(PageRequest::default()).await;

        assert!(envelope.programs.is_empty());
        assert_eq!(envelope.meta, Meta::error(NO_KEY_ERROR));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_requests_zero_based_page_with_projection() {
        let fetcher = Arc::new(StaticFetcher::new().with_body(URL, r#"{"results": []}"#));
        let scorecard =
            ScorecardConnector::new(fetcher.clone(), URL.to_string(), Some("key".to_string()));

        scorecard.programs(PageRequest::new(3, 20).unwrap()).await;

        let query = fetcher.last_query();
        assert!(query.contains(&("page".to_string(), "2".to_string())));
        assert!(query.contains(&("per_page".to_string(), "20".to_string())));
        assert!(query.contains(&("api_key".to_string(), "key".to_string())));
        assert!(query.contains(&(
            "fields".to_string(),
            "id,school.name,school.city,school.state,latest.cost.tuition.out_of_state,latest.cost.tuition.in_state".to_string()
        )));
    }

    #[tokio::test]
    async fn test_nested_and_flat_results_normalize_the_same() {
        let body = r#"{"results": [
            {"id": 1, "school": {"name": "Nested U", "city": "Boston"},
             "latest": {"cost": {"tuition": {"out_of_state": 40000, "in_state": 12000}}}},
            {"id": 2, "school.name": "Flat U", "school.city": "Austin",
             "latest.cost.tuition.out_of_state": null, "latest.cost.tuition.in_state": 9000}
        ]}"#;
        let scorecard = connector(StaticFetcher::new().with_body(URL, body), Some("key"));

        let envelope = scorecard.programs(PageRequest::new(1, 2).unwrap()).await;

        assert_eq!(envelope.meta, Meta::page(1, 2, true));
        let nested = &envelope.programs[0];
        assert_eq!(nested.name, "Nested U (various programs)");
        assert_eq!(nested.institution.as_deref(), Some("Nested U"));
        assert_eq!(nested.city, "Boston");
        assert_eq!(nested.tuition_amount, Some(40000.0));
        assert_eq!(nested.tuition_currency.as_deref(), Some("USD"));
        assert_eq!(nested.country, "US");
        assert_eq!(nested.source, "scorecard");
        assert_eq!(nested.source_id, "1");

        let flat = &envelope.programs[1];
        assert_eq!(flat.name, "Flat U (various programs)");
        assert_eq!(flat.city, "Austin");
        assert_eq!(flat.tuition_amount, Some(9000.0));
        assert_eq!(flat.source_id, "2");
    }

    #[tokio::test]
    async fn test_missing_fields_degrade_to_null() {
        let scorecard = connector(
            StaticFetcher::new().with_body(URL, r#"{"results": [{}]}"#),
            Some("key"),
        );

        let envelope = scorecard.programs(PageRequest::default()).await;

        let program = &envelope.programs[0];
        assert_eq!(program.name, "Unknown (various programs)");
        assert_eq!(program.institution, None);
        assert_eq!(program.tuition_amount, None);
        assert_eq!(program.city, "");
        assert_eq!(program.source_id, "");
        assert_eq!(envelope.meta, Meta::page(1, 1, false));
    }

    #[tokio::test]
    async fn test_missing_results_echoes_payload() {
        let scorecard = connector(
            StaticFetcher::new().with_body(URL, r#"{"error": {"code": "API_KEY_INVALID"}}"#),
            Some("bad"),
        );

        let envelope = scorecard.programs(PageRequest::default()).await;

        assert!(envelope.programs.is_empty());
        assert_eq!(envelope.meta.error.as_deref(), Some(FETCH_FAILED_ERROR));
        assert_eq!(
            envelope.meta.raw,
            Some(json!({"error": {"code": "API_KEY_INVALID"}}))
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_not_raised() {
        let scorecard = connector(
            StaticFetcher::new().with_error(URL, FetchError::Timeout),
            Some("key"),
        );

        let envelope = scorecard.programs(PageRequest::default()).await;

        assert!(envelope.programs.is_empty());
        assert_eq!(envelope.meta.error.as_deref(), Some(FETCH_FAILED_ERROR));
        assert_eq!(
            envelope.meta.raw,
            Some(json!({"_error": "upstream request timed out"}))
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_fetch_failure() {
        let scorecard = connector(
            StaticFetcher::new().with_body(URL, "<html>oops</html>"),
            Some("key"),
        );

        let envelope = scorecard.programs(PageRequest::default()).await;

        assert_eq!(envelope.meta.error.as_deref(), Some(FETCH_FAILED_ERROR));
        assert!(envelope.meta.raw.unwrap()["_error"]
            .as_str()
            .unwrap()
            .starts_with("invalid json"));
    }
}
