//! Table ingestion for region series.
//!
//! [`TableImporter`] resolves a table's column roles once, groups its rows
//! by region and converts each row through [`RowNormalizer`] into
//! [`StandardSeries`](regions_model::StandardSeries) records.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod register;
pub mod table;

pub use config::{ColumnPreset, ImportConfig, YearRange};
pub use error::{IngestError, Result, RowConversionError};
pub use normalize::{NormalizeOptions, RegionIdentity, RowNormalizer, normalize_row};
pub use pipeline::{NoProgress, ProgressObserver, TableImporter};
pub use register::{RegisterSummary, register_regions};
pub use table::read_table;
