//! Row to [`StandardSeries`] conversion.

use std::collections::BTreeSet;

use regions_map::{ColumnRole, MetadataSource, RequiredColumns};
use regions_model::{
    DEFAULT_SCALE, Row, StandardSeries, StartDay, TimeIndex, normalize_scale, split_tags,
};
use regions_resolve::{CodeResolver, ResolveError};
use tracing::{debug, trace, warn};

use crate::config::YearRange;
use crate::error::RowConversionError;

type RowResult<T> = std::result::Result<T, RowConversionError>;

/// Row-level options, built once per import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOptions {
    pub year_range: Option<YearRange>,
    /// Series codes to keep. When non-empty the blacklist is ignored.
    pub whitelist: BTreeSet<String>,
    /// Series codes to drop.
    pub blacklist: BTreeSet<String>,
    /// Index values by date instead of by year.
    pub json_compatible: bool,
    pub start_day: StartDay,
    pub resolve_regions: bool,
    pub strict_resolution: bool,
    /// Namespace hint passed to the resolver.
    pub namespace: Option<String>,
}

impl NormalizeOptions {
    /// Whether rows of `series_code` are imported at all.
    pub fn keeps(&self, series_code: &str) -> bool {
        if self.whitelist.is_empty() {
            !self.blacklist.contains(series_code)
        } else {
            self.whitelist.contains(series_code)
        }
    }
}

/// Region of one row, before and after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionIdentity {
    /// Code as found in the table or the region code map.
    pub raw_code: String,
    /// Code emitted in the output; the canonical code when resolution hit.
    pub code: String,
    pub name: String,
}

/// Converts rows of one table using its resolved columns.
pub struct RowNormalizer<'a> {
    columns: &'a RequiredColumns,
    options: &'a NormalizeOptions,
    resolver: Option<&'a CodeResolver<'a>>,
}

impl<'a> RowNormalizer<'a> {
    pub fn new(columns: &'a RequiredColumns, options: &'a NormalizeOptions) -> Self {
        Self {
            columns,
            options,
            resolver: None,
        }
    }

    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a CodeResolver<'a>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn columns(&self) -> &RequiredColumns {
        self.columns
    }

    /// Reads the region name and code of a row and resolves the code when enabled.
    pub fn identify(&self, row: &Row) -> RowResult<RegionIdentity> {
        let name = required_text(row, ColumnRole::RegionName, &self.columns.region_name)?;
        let raw_code = match &self.columns.region_code {
            MetadataSource::Column(label) => required_text(row, ColumnRole::RegionCode, label)?,
            MetadataSource::Map(map) => map
                .get(&name)
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .ok_or_else(|| RowConversionError::MissingField {
                    role: ColumnRole::RegionCode,
                    source_name: format!("regionCodeMap['{name}']"),
                })?,
        };

        let code = match self.resolver {
            Some(resolver) if self.options.resolve_regions => {
                self.resolve_code(resolver, &raw_code, &name)?
            }
            _ => raw_code.clone(),
        };
        Ok(RegionIdentity {
            raw_code,
            code,
            name,
        })
    }

    /// Code first, then name; a miss keeps the raw code unless resolution is strict.
    fn resolve_code(&self, resolver: &CodeResolver<'_>, raw_code: &str, name: &str) -> RowResult<String> {
        let hint = self.options.namespace.as_deref();
        let resolved = match resolver.resolve(raw_code, hint).map_err(ResolveError::from)? {
            Some(hit) => Some(hit),
            None => resolver.resolve(name, hint).map_err(ResolveError::from)?,
        };
        match resolved {
            Some(resolution) => {
                trace!(raw_code, code = %resolution.region_code, "region resolved");
                Ok(resolution.region_code)
            }
            None if self.options.strict_resolution => Err(RowConversionError::UnresolvedCode {
                value: raw_code.to_string(),
                namespace: self.options.namespace.clone(),
            }),
            None => {
                warn!(raw_code, name, "region not found in reference store, keeping raw code");
                Ok(raw_code.to_string())
            }
        }
    }

    /// Converts a row whose region is already identified.
    ///
    /// Returns `Ok(None)` when the series is filtered out.
    pub fn convert(&self, row: &Row, region: &RegionIdentity) -> RowResult<Option<StandardSeries>> {
        let series_code = required_text(row, ColumnRole::SeriesCode, &self.columns.series_code)?;
        if !self.options.keeps(&series_code) {
            debug!(series_code = %series_code, region = %region.code, "series filtered out");
            return Ok(None);
        }
        let series_name = required_text(row, ColumnRole::SeriesName, &self.columns.series_name)?;

        let lookup = |source: &Option<MetadataSource>| {
            metadata(row, source.as_ref(), &region.raw_code, &series_code)
        };
        let scale = lookup(&self.columns.scale)
            .map(|raw| normalize_scale(&raw))
            .unwrap_or_else(|| DEFAULT_SCALE.to_string());
        let tags = lookup(&self.columns.tags)
            .map(|raw| split_tags(&raw))
            .unwrap_or_default();

        Ok(Some(StandardSeries {
            region_code: region.code.clone(),
            region_name: region.name.clone(),
            series_code: series_code.clone(),
            series_name,
            description: lookup(&self.columns.description),
            notes: lookup(&self.columns.notes).unwrap_or_default(),
            units: lookup(&self.columns.units),
            scale,
            tags,
            values: self.values(row),
        }))
    }

    /// Whether the row's series code is excluded by the whitelist or blacklist.
    ///
    /// Rows without a series code are not excluded here; conversion reports them.
    pub fn filters_out(&self, row: &Row) -> bool {
        row.text(&self.columns.series_code)
            .is_some_and(|series_code| !self.options.keeps(&series_code))
    }

    /// Identifies and converts a single row.
    pub fn normalize(&self, row: &Row) -> RowResult<Option<StandardSeries>> {
        if self.filters_out(row) {
            return Ok(None);
        }
        let region = self.identify(row)?;
        self.convert(row, &region)
    }

    /// Numeric cells of the time columns, filtered by year and ordered by time.
    fn values(&self, row: &Row) -> Vec<(TimeIndex, f64)> {
        let mut values: Vec<(TimeIndex, f64)> = self
            .columns
            .time_columns
            .iter()
            .filter(|column| {
                self.options
                    .year_range
                    .is_none_or(|range| range.contains(column.index.year()))
            })
            .filter_map(|column| {
                let value = row.get(&column.label)?.as_number()?;
                let index = if self.options.json_compatible {
                    TimeIndex::Date(column.index.to_date(self.options.start_day))
                } else {
                    column.index
                };
                Some((index, value))
            })
            .collect();
        values.sort_by_key(|(index, _)| *index);
        values
    }
}

/// Converts one row; see [`RowNormalizer::normalize`].
pub fn normalize_row(
    row: &Row,
    columns: &RequiredColumns,
    options: &NormalizeOptions,
    resolver: Option<&CodeResolver<'_>>,
) -> RowResult<Option<StandardSeries>> {
    let normalizer = RowNormalizer {
        columns,
        options,
        resolver,
    };
    normalizer.normalize(row)
}

fn required_text(row: &Row, role: ColumnRole, label: &str) -> RowResult<String> {
    row.text(label).ok_or_else(|| RowConversionError::MissingField {
        role,
        source_name: label.to_string(),
    })
}

/// Looks metadata up in its column, or in its map under `region|series` then `series`.
fn metadata(
    row: &Row,
    source: Option<&MetadataSource>,
    region_code: &str,
    series_code: &str,
) -> Option<String> {
    let value = match source? {
        MetadataSource::Column(label) => return row.text(label),
        MetadataSource::Map(map) => map
            .get(&format!("{region_code}|{series_code}"))
            .or_else(|| map.get(series_code))?,
    };
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
