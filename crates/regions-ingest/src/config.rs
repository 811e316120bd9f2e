//! Import configuration: one explicit struct instead of ad hoc keyword probing.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use regions_map::{ColumnOverrides, ColumnRole};
use regions_model::StartDay;
use regions_resolve::ResolverOptions;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};
use crate::normalize::NormalizeOptions;

/// Inclusive year bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    #[serde(default)]
    pub min: Option<i32>,
    #[serde(default)]
    pub max: Option<i32>,
}

impl YearRange {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min.is_none_or(|min| year >= min) && self.max.is_none_or(|max| year <= max)
    }
}

/// Known table layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnPreset {
    /// IMF World Economic Outlook.
    Weo,
}

/// Everything the ingestion entry point can be told about a table.
///
/// Field names follow the camelCase keys of JSON and TOML config files.
/// Each `*Map` field overrides the matching `*Column` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    pub preset: Option<ColumnPreset>,

    pub region_code_column: Option<String>,
    pub region_name_column: Option<String>,
    pub series_code_column: Option<String>,
    pub series_name_column: Option<String>,

    pub series_note_column: Option<String>,
    pub series_note_map: Option<BTreeMap<String, String>>,
    pub series_tag_column: Option<String>,
    pub series_tag_map: Option<BTreeMap<String, String>>,
    pub series_scale_column: Option<String>,
    pub series_scale_map: Option<BTreeMap<String, String>>,
    pub series_unit_column: Option<String>,
    pub series_unit_map: Option<BTreeMap<String, String>>,
    pub series_description_column: Option<String>,
    pub series_description_map: Option<BTreeMap<String, String>>,

    /// Region name to region code, used instead of a code column.
    pub region_code_map: Option<BTreeMap<String, String>>,

    pub year_range: Option<YearRange>,
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
    /// Emit dates instead of plain years as time indices.
    pub json_compatible: bool,
    /// Month and day (`MM-DD`) used when converting years to dates.
    pub start_day: Option<String>,

    /// Region type for every record; the column heuristics decide otherwise.
    pub region_type: Option<String>,
    /// Namespace of the table's region codes.
    pub namespace: Option<String>,
    pub resolve_regions: bool,
    pub strict_resolution: bool,
    pub fuzzy_threshold: Option<f64>,

    pub report: Option<BTreeMap<String, String>>,
    pub agency: Option<BTreeMap<String, String>>,
}

impl ImportConfig {
    /// Reads a config file. `.toml` files are parsed as TOML, everything else as JSON.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        let parsed = if is_toml {
            toml::from_str(&text).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&text).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| IngestError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Column overrides for the heuristics: preset first, explicit fields on top.
    pub fn column_overrides(&self) -> ColumnOverrides {
        let mut overrides = match self.preset {
            Some(ColumnPreset::Weo) => ColumnOverrides::weo(),
            None => ColumnOverrides::new(),
        };

        let columns = [
            (ColumnRole::RegionCode, &self.region_code_column),
            (ColumnRole::RegionName, &self.region_name_column),
            (ColumnRole::SeriesCode, &self.series_code_column),
            (ColumnRole::SeriesName, &self.series_name_column),
            (ColumnRole::Notes, &self.series_note_column),
            (ColumnRole::Tags, &self.series_tag_column),
            (ColumnRole::Scale, &self.series_scale_column),
            (ColumnRole::Units, &self.series_unit_column),
            (ColumnRole::Description, &self.series_description_column),
        ];
        for (role, label) in columns {
            if let Some(label) = label {
                overrides.set_column(role, label.clone());
            }
        }

        let maps = [
            (ColumnRole::RegionCode, &self.region_code_map),
            (ColumnRole::Notes, &self.series_note_map),
            (ColumnRole::Tags, &self.series_tag_map),
            (ColumnRole::Scale, &self.series_scale_map),
            (ColumnRole::Units, &self.series_unit_map),
            (ColumnRole::Description, &self.series_description_map),
        ];
        for (role, map) in maps {
            if let Some(map) = map {
                overrides.set_map(role, map.clone());
            }
        }
        overrides
    }

    /// Resolver tuning; the threshold defaults to the resolver's own.
    pub fn resolver_options(&self) -> ResolverOptions {
        let mut options = ResolverOptions::default();
        if let Some(threshold) = self.fuzzy_threshold {
            options.threshold = threshold;
        }
        options
    }

    /// Row-level options, validated.
    pub fn normalize_options(&self) -> Result<NormalizeOptions> {
        let start_day = match &self.start_day {
            Some(raw) => raw
                .parse::<StartDay>()
                .map_err(|e| IngestError::InvalidOption {
                    field: "startDay".to_string(),
                    message: e.to_string(),
                })?,
            None => StartDay::default(),
        };
        if let Some(range) = self.year_range
            && let (Some(min), Some(max)) = (range.min, range.max)
            && min > max
        {
            return Err(IngestError::InvalidOption {
                field: "yearRange".to_string(),
                message: format!("min {min} is greater than max {max}"),
            });
        }
        Ok(NormalizeOptions {
            year_range: self.year_range,
            whitelist: self.whitelist.iter().map(|c| c.trim().to_string()).collect::<BTreeSet<_>>(),
            blacklist: self.blacklist.iter().map(|c| c.trim().to_string()).collect::<BTreeSet<_>>(),
            json_compatible: self.json_compatible,
            start_day,
            resolve_regions: self.resolve_regions,
            strict_resolution: self.strict_resolution,
            namespace: self.namespace.clone(),
        })
    }
}
