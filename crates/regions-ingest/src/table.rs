use std::path::Path;

use csv::ReaderBuilder;
use regions_model::{CellValue, Row, Table, delimiter_for_path};
use tracing::debug;

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> CellValue {
    CellValue::from(raw.trim().trim_matches('\u{feff}'))
}

/// Reads a delimited text file into a [`Table`].
///
/// The first non-blank record is the header. `.tsv` and `.tab` files are
/// tab separated, everything else comma separated. Short records are padded
/// with missing cells and blank records are skipped.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter_for_path(path))
        .from_reader(file);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }

    let mut records = records.into_iter();
    let Some(header) = records.next() else {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    };
    let columns: Vec<String> = header.iter().map(normalize_header).collect();

    let mut table = Table::new(columns);
    for record in records {
        let row: Row = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.clone(), normalize_cell(record.get(idx).unwrap_or(""))))
            .collect();
        table.push_row(row);
    }
    debug!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.len(),
        "table loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_lose_bom_and_extra_whitespace() {
        assert_eq!(normalize_header("\u{feff}region  Code "), "region Code");
        assert_eq!(normalize_cell("  "), CellValue::Missing);
        assert_eq!(normalize_cell(" 3.2 "), CellValue::Text("3.2".to_string()));
    }
}
