use url::form_urlencoded;

use crate::api::errors::ApiError;
use crate::connectors::PageRequest;
use crate::country::CountrySelector;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramsQueryParams {
    /// Country key, case-insensitive. Defaults to `ALL`.
    pub country: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
    /// Shared secret, consulted when the header is absent
    pub secret: Option<String>,
}

impl ProgramsQueryParams {
    /// Reads the known keys out of a raw query string. Decoding never fails: a
    /// repeated key keeps its first value and unknown keys are ignored.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = ProgramsQueryParams::default();
        let Some(raw) = raw else {
            return params;
        };

        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "country" => &mut params.country,
                "page" => &mut params.page,
                "per_page" => &mut params.per_page,
                "secret" => &mut params.secret,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }

    pub fn country(&self) -> CountrySelector {
        CountrySelector::parse(self.country.as_deref().unwrap_or_default())
    }

    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        let page = positive("page", self.page.as_deref(), PageRequest::DEFAULT_PAGE)?;
        let per_page = positive(
            "per_page",
            self.per_page.as_deref(),
            PageRequest::DEFAULT_PER_PAGE,
        )?;

        // Both values are at least 1 at this point
        Ok(PageRequest { page, per_page })
    }
}

fn positive(name: &'static str, raw: Option<&str>, default: u32) -> Result<u32, ApiError> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(default);
    }

    match raw.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ApiError::InvalidParameter {
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::CsvCountry;

    fn params(page: Option<&str>, per_page: Option<&str>) -> ProgramsQueryParams {
        ProgramsQueryParams {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_query_keeps_first_value() {
        let query = ProgramsQueryParams::from_query(Some(
            "country=US&country=UK&secret=a%20b&secret=other&per_page=5&utm=x",
        ));

        assert_eq!(
            query,
            ProgramsQueryParams {
                country: Some("US".to_string()),
                page: None,
                per_page: Some("5".to_string()),
                secret: Some("a b".to_string()),
            }
        );
    }

    #[test]
    fn test_from_query_without_query_string() {
        assert_eq!(
            ProgramsQueryParams::from_query(None),
            ProgramsQueryParams::default()
        );
        assert_eq!(
            ProgramsQueryParams::from_query(Some("")),
            ProgramsQueryParams::default()
        );
    }

    #[test]
    fn test_defaults() {
        let query = ProgramsQueryParams::default();

        assert_eq!(query.country(), CountrySelector::All);
        assert_eq!(query.page_request(), Ok(PageRequest::default()));
        assert_eq!(
            params(Some(""), Some("")).page_request(),
            Ok(PageRequest { page: 1, per_page: 100 })
        );
    }

    #[test]
    fn test_explicit_values() {
        assert_eq!(
            params(Some("4"), Some(" 25 ")).page_request(),
            Ok(PageRequest { page: 4, per_page: 25 })
        );

        let query = ProgramsQueryParams {
            country: Some("singapore".to_string()),
            ..Default::default()
        };
        assert_eq!(query.country(), CountrySelector::Csv(CsvCountry::Singapore));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        assert_eq!(
            params(Some("0"), None).page_request(),
            Err(ApiError::InvalidParameter {
                name: "page",
                value: "0".to_string()
            })
        );
        assert_eq!(
            params(None, Some("-5")).page_request(),
            Err(ApiError::InvalidParameter {
                name: "per_page",
                value: "-5".to_string()
            })
        );
        assert!(params(Some("two"), None).page_request().is_err());
    }
}
