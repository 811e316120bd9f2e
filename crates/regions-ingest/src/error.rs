use std::collections::BTreeMap;
use std::path::PathBuf;

use regions_map::{ColumnRole, MappingError, RequiredColumns};
use regions_resolve::ResolveError;
use regions_store::StoreError;

/// Why a single row could not become a series.
#[derive(Debug, thiserror::Error)]
pub enum RowConversionError {
    #[error("missing {role} (source {source_name})")]
    MissingField {
        role: ColumnRole,
        source_name: String,
    },

    #[error("could not resolve region '{value}'{}", in_namespace(.namespace))]
    UnresolvedCode {
        value: String,
        namespace: Option<String>,
    },

    #[error("region lookup failed: {0}")]
    Resolve(#[from] ResolveError),
}

fn in_namespace(namespace: &Option<String>) -> String {
    namespace
        .as_deref()
        .map(|ns| format!(" in namespace '{ns}'"))
        .unwrap_or_default()
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Columns(#[from] MappingError),

    /// `index` counts data rows from zero; the message counts them from one.
    #[error("data row {}: {source}; row: {}; columns: {columns}", .index + 1, format_row(.row))]
    Row {
        index: usize,
        row: BTreeMap<String, String>,
        columns: Box<RequiredColumns>,
        #[source]
        source: RowConversionError,
    },

    #[error("import cancelled after {done} of {total} region groups")]
    Cancelled { done: usize, total: usize },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("table {path} has no header row")]
    EmptyTable { path: PathBuf },

    #[error("invalid import config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("invalid import option {field}: {message}")]
    InvalidOption { field: String, message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn format_row(row: &BTreeMap<String, String>) -> String {
    row.iter()
        .map(|(label, value)| format!("{label}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, IngestError>;
