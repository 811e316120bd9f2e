//! The resolved, validated column mapping of one input table.

use std::fmt;

use serde::Serialize;

use regions_model::labels as column_labels;

use crate::detect::{DEFAULT_REGION_TYPE, TimeColumn, classify_label, detect_columns};
use crate::error::{MappingError, Result};
use crate::overrides::{ColumnOverrides, MetadataSource};
use crate::roles::ColumnRole;

/// Role sources for one table.
///
/// Built once per import and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredColumns {
    pub region_code: MetadataSource,
    pub region_name: String,
    pub series_code: String,
    pub series_name: String,
    pub notes: Option<MetadataSource>,
    pub scale: Option<MetadataSource>,
    pub units: Option<MetadataSource>,
    pub description: Option<MetadataSource>,
    pub tags: Option<MetadataSource>,
    pub time_columns: Vec<TimeColumn>,
    pub region_type: String,
}

impl RequiredColumns {
    /// Resolves every role against a table's labels.
    ///
    /// Fails with [`MappingError::MissingColumns`] naming each required role
    /// that has neither a lookup map nor a column present in `labels`. An
    /// explicit column override the table does not contain counts as missing.
    pub fn resolve(labels: &[String], overrides: &ColumnOverrides) -> Result<Self> {
        let detected = detect_columns(labels, overrides);
        let mut missing = Vec::new();

        let mut source = |role: ColumnRole| -> Option<MetadataSource> {
            let resolved = match overrides.map(role) {
                Some(map) => Some(MetadataSource::Map(map.clone())),
                None => detected
                    .label(role)
                    .filter(|label| labels.iter().any(|l| l == label))
                    .map(|label| MetadataSource::Column(label.to_string())),
            };
            if resolved.is_none() && !role.is_optional() {
                missing.push(role);
            }
            resolved
        };

        let region_code = source(ColumnRole::RegionCode);
        let region_name = source(ColumnRole::RegionName);
        let series_code = source(ColumnRole::SeriesCode);
        let series_name = source(ColumnRole::SeriesName);
        let notes = source(ColumnRole::Notes);
        let scale = source(ColumnRole::Scale);
        let units = source(ColumnRole::Units);
        let description = source(ColumnRole::Description);
        let tags = source(ColumnRole::Tags);

        let column_of = |s: Option<MetadataSource>| match s {
            Some(MetadataSource::Column(label)) => Some(label),
            _ => None,
        };

        match (
            region_code,
            column_of(region_name),
            column_of(series_code),
            column_of(series_name),
        ) {
            (Some(region_code), Some(region_name), Some(series_code), Some(series_name))
                if missing.is_empty() =>
            {
                Ok(Self {
                    region_code,
                    region_name,
                    series_code,
                    series_name,
                    notes,
                    scale,
                    units,
                    description,
                    tags,
                    time_columns: detected.time_columns,
                    region_type: detected.region_type,
                })
            }
            _ => Err(MappingError::MissingColumns {
                roles: missing,
                available: labels.to_vec(),
            }),
        }
    }

    /// The standard wide layout with no time columns.
    pub fn standard() -> Self {
        let column = |label: &str| Some(MetadataSource::Column(label.to_string()));
        Self {
            region_code: MetadataSource::Column(column_labels::REGION_CODE.to_string()),
            region_name: column_labels::REGION_NAME.to_string(),
            series_code: column_labels::SERIES_CODE.to_string(),
            series_name: column_labels::SERIES_NAME.to_string(),
            notes: column(column_labels::SERIES_NOTES),
            scale: column(column_labels::SERIES_SCALE),
            units: column(column_labels::SERIES_UNITS),
            description: column(column_labels::SERIES_DESCRIPTION),
            tags: column(column_labels::SERIES_TAGS),
            time_columns: Vec::new(),
            region_type: DEFAULT_REGION_TYPE.to_string(),
        }
    }

    /// Adds every label that parses as a time point as a time column.
    #[must_use]
    pub fn with_time_columns<'a>(mut self, labels: impl IntoIterator<Item = &'a str>) -> Self {
        self.time_columns = labels
            .into_iter()
            .filter_map(|label| {
                classify_label(label).map(|index| TimeColumn {
                    label: label.to_string(),
                    index,
                })
            })
            .collect();
        self
    }

    /// The source resolved for `role`.
    pub fn source(&self, role: ColumnRole) -> Option<MetadataSource> {
        let column = |label: &str| Some(MetadataSource::Column(label.to_string()));
        match role {
            ColumnRole::RegionCode => Some(self.region_code.clone()),
            ColumnRole::RegionName => column(&self.region_name),
            ColumnRole::SeriesCode => column(&self.series_code),
            ColumnRole::SeriesName => column(&self.series_name),
            ColumnRole::Notes => self.notes.clone(),
            ColumnRole::Scale => self.scale.clone(),
            ColumnRole::Units => self.units.clone(),
            ColumnRole::Description => self.description.clone(),
            ColumnRole::Tags => self.tags.clone(),
        }
    }
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(label) => write!(f, "'{label}'"),
            Self::Map(map) => write!(f, "map({} entries)", map.len()),
        }
    }
}

impl fmt::Display for RequiredColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for role in ColumnRole::ALL {
            if let Some(source) = self.source(role) {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{role}={source}")?;
                first = false;
            }
        }
        write!(f, "; {} time columns", self.time_columns.len())
    }
}
