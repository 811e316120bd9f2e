use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A single table cell as delivered by a tabular reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Returns true for cells that carry no information (missing, blank or `nan`).
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Number(value) => value.is_nan(),
            Self::Text(text) => {
                let trimmed = text.trim();
                trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
            }
        }
    }

    /// Returns the cell as trimmed text, or `None` when it is missing.
    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            Self::Text(text) => Some(text.trim().to_string()),
            Self::Number(value) => Some(format_number(*value)),
            Self::Missing => None,
        }
    }

    /// Returns the cell as a finite number, or `None` when it cannot be parsed.
    ///
    /// Thousands separators are ignored.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().replace(',', "").parse::<f64>().ok()?,
            Self::Missing => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            Self::Missing
        } else {
            Self::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Formats a number without a trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One table row: a mapping from column label to cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: &str) -> Option<&CellValue> {
        self.cells.get(label)
    }

    /// Returns the non-missing text of a cell.
    pub fn text(&self, label: &str) -> Option<String> {
        self.get(label).and_then(CellValue::as_text)
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(label.into(), value.into());
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Renders every cell as text, for error reports.
    pub fn to_text_map(&self) -> BTreeMap<String, String> {
        self.cells
            .iter()
            .map(|(label, cell)| (label.clone(), cell.as_text().unwrap_or_default()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A fully loaded input table: ordered column labels plus rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Picks the field delimiter for a delimited text file from its extension.
pub fn delimiter_for_path(path: &Path) -> u8 {
    let is_tab = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab"))
        .unwrap_or(false);
    if is_tab { b'\t' } else { b',' }
}
