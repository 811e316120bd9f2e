//! Delimited-text helpers for reference bootstrap files.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use regions_model::delimiter_for_path;

use crate::error::{Result, StoreError};

pub(crate) type CsvRow = BTreeMap<String, String>;

/// Reads a bootstrap file into row maps keyed by header.
///
/// The delimiter follows the file extension. Headers and values are trimmed
/// and a leading BOM is dropped. Every label in `required` must be present in
/// the header; failures are reported against `namespace`.
pub(crate) fn read_csv_rows(path: &Path, namespace: &str, required: &[&str]) -> Result<Vec<CsvRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter_for_path(path))
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoreError::bootstrap(namespace, path, e.to_string()))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| StoreError::bootstrap(namespace, path, format!("read headers: {e}")))?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|label| !headers.iter().any(|h| h == label))
        .collect();
    if !missing.is_empty() {
        return Err(StoreError::bootstrap(
            namespace,
            path,
            format!("missing columns: {}", missing.join(", ")),
        ));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            StoreError::bootstrap(namespace, path, format!("record {}: {e}", index + 1))
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers.get(idx).cloned().unwrap_or_default();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Get a field value from a row, returning empty string if not present.
pub(crate) fn get_field<'a>(row: &'a CsvRow, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}
