use std::collections::HashMap;

use csv::{ByteRecord, ReaderBuilder};

const UTF8_BOM: &str = "\u{feff}";

/// One decoded CSV row, keyed by the header names exactly as the upstream wrote them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    cells: HashMap<String, String>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Decodes a delimited payload with a header row into records, in row order.
///
/// Decoding is permissive: short rows simply lack the trailing keys, extra cells are
/// dropped, and invalid UTF-8 is replaced rather than rejected. An empty payload is
/// an empty result.
pub fn decode_records(data: &[u8]) -> Vec<Record> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = reader.byte_records();

    let headers: Vec<String> = match rows.next() {
        Some(Ok(header_row)) => header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let name = String::from_utf8_lossy(cell);
                if i == 0 {
                    name.trim_start_matches(UTF8_BOM).to_string()
                } else {
                    name.into_owned()
                }
            })
            .collect(),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "failed to read csv header row");
            return Vec::new();
        }
        None => return Vec::new(),
    };

    rows.filter_map(|row| match row {
        Ok(row) => Some(to_record(&headers, &row)),
        Err(e) => {
            tracing::warn!(error = %e, "skipping unreadable csv row");
            None
        }
    })
    .collect()
}

fn to_record(headers: &[String], row: &ByteRecord) -> Record {
    headers
        .iter()
        .zip(row.iter())
        .map(|(header, cell)| (header.clone(), String::from_utf8_lossy(cell).into_owned()))
        .collect()
}
