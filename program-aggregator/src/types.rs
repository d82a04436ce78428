use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default `degree_level` for sources that do not break listings down by degree.
pub const ALL_DEGREE_LEVELS: &str = "all";

/// A single program (or institution-level) listing, normalized across every source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProgram {
    pub name: String,
    pub institution: Option<String>,
    pub degree_level: String,
    pub tuition_amount: Option<f64>,
    pub tuition_currency: Option<String>,
    pub country: String,
    pub city: String,
    pub source: String,
    pub source_id: String,
}

/// Name used when a record carries no usable program name.
pub fn various_programs_name(institution: Option<&str>) -> String {
    format!("{} (various programs)", institution.unwrap_or("Unknown"))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl Meta {
    pub fn page(page: u32, count: usize, more: bool) -> Self {
        Meta {
            page: Some(page),
            count: Some(count),
            more: Some(more),
            ..Default::default()
        }
    }

    pub fn error(tag: impl Into<String>) -> Self {
        Meta {
            error: Some(tag.into()),
            ..Default::default()
        }
    }

    pub fn error_with_raw(tag: impl Into<String>, raw: Value) -> Self {
        Meta {
            error: Some(tag.into()),
            raw: Some(raw),
            ..Default::default()
        }
    }
}

/// The `{programs, meta}` wrapper returned by every connector and by the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub programs: Vec<CanonicalProgram>,
    pub meta: Meta,
}

impl Envelope {
    pub fn failed(meta: Meta) -> Self {
        Envelope {
            programs: Vec::new(),
            meta,
        }
    }

    pub fn is_error(&self) -> bool {
        self.meta.error.is_some()
    }
}
