//! Shared domain types for region series normalization.

#![deny(unsafe_code)]

pub mod error;
pub mod region;
pub mod scale;
pub mod series;
pub mod table;
pub mod time;

pub use error::{ModelError, Result};
pub use region::{
    Alias, Code, Namespace, NamespaceId, NewNamespace, Region, RegionId, is_valid_code,
    normalize_code,
};
pub use scale::{DEFAULT_SCALE, STANDARD_SCALES, Scale, multiplier_for, normalize_scale};
pub use series::{
    NormalizedDataset, RegionRecord, StandardSeries, TAG_DELIMITER, labels, split_tags,
};
pub use table::{CellValue, Row, Table, delimiter_for_path, format_number};
pub use time::{StartDay, TimeIndex};
