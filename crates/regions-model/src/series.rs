//! Normalized series and the dataset they are delivered in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scale::DEFAULT_SCALE;
use crate::table::{CellValue, Row};
use crate::time::TimeIndex;

/// Column labels of the standard wide table layout.
pub mod labels {
    pub const REGION_CODE: &str = "regionCode";
    pub const REGION_NAME: &str = "regionName";
    pub const SERIES_CODE: &str = "seriesCode";
    pub const SERIES_NAME: &str = "seriesName";
    pub const SERIES_NOTES: &str = "seriesNotes";
    pub const SERIES_SCALE: &str = "seriesScale";
    pub const SERIES_UNITS: &str = "seriesUnits";
    pub const SERIES_DESCRIPTION: &str = "seriesDescription";
    pub const SERIES_TAGS: &str = "seriesTags";
}

/// Separator for tags packed into a single cell.
pub const TAG_DELIMITER: char = '|';

/// Splits a packed tag cell into individual tags, dropping empty entries.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(TAG_DELIMITER)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// One normalized, time-indexed statistical series for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardSeries {
    pub region_code: String,
    pub region_name: String,
    pub series_code: String,
    pub series_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default = "default_scale")]
    pub scale: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ordered `(time, value)` pairs; never contains NaN.
    #[serde(default)]
    pub values: Vec<(TimeIndex, f64)>,
}

fn default_scale() -> String {
    DEFAULT_SCALE.to_string()
}

impl StandardSeries {
    /// Flattens the series back into a row of the standard wide layout.
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert(labels::REGION_CODE, self.region_code.as_str());
        row.insert(labels::REGION_NAME, self.region_name.as_str());
        row.insert(labels::SERIES_CODE, self.series_code.as_str());
        row.insert(labels::SERIES_NAME, self.series_name.as_str());
        row.insert(labels::SERIES_NOTES, self.notes.as_str());
        row.insert(labels::SERIES_SCALE, self.scale.as_str());
        if let Some(description) = &self.description {
            row.insert(labels::SERIES_DESCRIPTION, description.as_str());
        }
        if let Some(units) = &self.units {
            row.insert(labels::SERIES_UNITS, units.as_str());
        }
        row.insert(labels::SERIES_TAGS, self.tags.join("|"));
        for (time, value) in &self.values {
            row.insert(time.label(), CellValue::Number(*value));
        }
        row
    }

    /// Earliest and latest time index, if the series has values.
    pub fn span(&self) -> Option<(TimeIndex, TimeIndex)> {
        let first = self.values.iter().map(|(t, _)| *t).min()?;
        let last = self.values.iter().map(|(t, _)| *t).max()?;
        Some((first, last))
    }
}

/// All series of one region, as emitted by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecord {
    pub region_name: String,
    pub region_code: String,
    pub region_type: String,
    pub series: Vec<StandardSeries>,
}

/// Output of one table import, ready for a persistence layer.
///
/// `report`, `agency` and `namespace` are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub regions: Vec<RegionRecord>,
}

impl NormalizedDataset {
    pub fn series_count(&self) -> usize {
        self.regions.iter().map(|r| r.series.len()).sum()
    }

    pub fn value_count(&self) -> usize {
        self.regions
            .iter()
            .flat_map(|r| &r.series)
            .map(|s| s.values.len())
            .sum()
    }

    pub fn series(&self) -> impl Iterator<Item = &StandardSeries> {
        self.regions.iter().flat_map(|r| r.series.iter())
    }
}
