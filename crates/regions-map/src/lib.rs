//! Column heuristics: which labels of an arbitrary statistical table hold the
//! region, the series metadata and the time-indexed values.

#![deny(unsafe_code)]

pub mod detect;
pub mod error;
pub mod overrides;
pub mod required;
pub mod roles;

pub use detect::{
    DEFAULT_REGION_TYPE, DetectedColumns, TimeColumn, classify_label, detect_columns, find_column,
};
pub use error::{MappingError, Result};
pub use overrides::{ColumnOverrides, MetadataSource};
pub use required::RequiredColumns;
pub use roles::ColumnRole;
