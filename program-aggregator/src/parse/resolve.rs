use serde_json::Value;

use super::records::Record;

/// Returns the first candidate whose value is present and not blank, trimmed.
pub fn resolve<'a>(record: &'a Record, candidates: &[&str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|key| record.get(key))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Resolves like [`resolve`] and parses the winner as a float. A value that does not
/// parse yields `None`; later candidates are not consulted.
pub fn resolve_number(record: &Record, candidates: &[&str]) -> Option<f64> {
    resolve(record, candidates).and_then(parse_number)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Looks up a dotted path in a JSON object, accepting both the nested form
/// (`{"school": {"name": ..}}`) and the flattened form (`{"school.name": ..}`).
/// `null` counts as absent.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let nested = path
        .split('.')
        .try_fold(value, |current, segment| current.get(segment));

    nested
        .filter(|v| !v.is_null())
        .or_else(|| value.get(path).filter(|v| !v.is_null()))
}

pub fn lookup_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    lookup(value, path)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

pub fn lookup_number(value: &Value, path: &str) -> Option<f64> {
    match lookup(value, path)? {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Renders an identifier that may arrive as either a number or a string.
pub fn lookup_id(value: &Value, path: &str) -> Option<String> {
    match lookup(value, path)? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
