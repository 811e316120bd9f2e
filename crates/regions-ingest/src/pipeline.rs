//! Table ingestion: columns once, then rows grouped by region.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::path::Path;

use regions_map::RequiredColumns;
use regions_model::{NormalizedDataset, RegionRecord, Row, Table};
use regions_resolve::{CodeResolver, ResolveError};
use tracing::{debug, info, info_span, trace};

use crate::config::ImportConfig;
use crate::error::{IngestError, Result, RowConversionError};
use crate::normalize::{RegionIdentity, RowNormalizer};
use crate::table::read_table;

/// Receives progress over region groups. Never affects output order.
pub trait ProgressObserver {
    /// Called once with the number of region groups.
    fn start(&mut self, _total: usize) {}

    /// Called after each group. Returning `Break` cancels the import.
    fn advance(&mut self, _done: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn finish(&mut self) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Rows sharing one output region code, in table order.
struct RegionGroup {
    code: String,
    rows: Vec<(usize, RegionIdentity)>,
}

/// Converts whole tables into a [`NormalizedDataset`].
pub struct TableImporter<'a> {
    config: &'a ImportConfig,
    resolver: Option<&'a CodeResolver<'a>>,
}

impl<'a> TableImporter<'a> {
    pub fn new(config: &'a ImportConfig) -> Self {
        Self {
            config,
            resolver: None,
        }
    }

    /// Uses `resolver` for rows when the config enables region resolution.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a CodeResolver<'a>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Resolves the table's column roles against the config.
    pub fn columns(&self, table: &Table) -> Result<RequiredColumns> {
        let mut columns = RequiredColumns::resolve(&table.columns, &self.config.column_overrides())?;
        if let Some(region_type) = &self.config.region_type {
            columns.region_type.clone_from(region_type);
        }
        Ok(columns)
    }

    pub fn import(&self, table: &Table) -> Result<NormalizedDataset> {
        self.import_with_progress(table, &mut NoProgress)
    }

    /// Imports a table, reporting each finished region group to `progress`.
    ///
    /// Fails on the first row that cannot be converted; nothing partial is returned.
    pub fn import_with_progress(
        &self,
        table: &Table,
        progress: &mut dyn ProgressObserver,
    ) -> Result<NormalizedDataset> {
        let span = info_span!("import_table", rows = table.len(), columns = table.columns.len());
        let _guard = span.enter();

        let columns = self.columns(table)?;
        let options = self.config.normalize_options()?;
        let mut normalizer = RowNormalizer::new(&columns, &options);
        if let Some(resolver) = self.resolver {
            normalizer = normalizer.with_resolver(resolver);
        }
        debug!(
            %columns,
            region_type = %columns.region_type,
            "columns resolved"
        );

        // Store failures abort the import as such, not as a bad row.
        let row_error = |index: usize, row: &Row, source: RowConversionError| match source {
            RowConversionError::Resolve(ResolveError::Store(source)) => IngestError::Store(source),
            source => IngestError::Row {
                index,
                row: row.to_text_map(),
                columns: Box::new(columns.clone()),
                source,
            },
        };

        let mut groups: Vec<RegionGroup> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();
        for (index, row) in table.rows.iter().enumerate() {
            if normalizer.filters_out(row) {
                trace!(row = index, "series filtered out before region lookup");
                continue;
            }
            let identity = normalizer
                .identify(row)
                .map_err(|source| row_error(index, row, source))?;
            let slot = *group_index.entry(identity.code.clone()).or_insert_with(|| {
                groups.push(RegionGroup {
                    code: identity.code.clone(),
                    rows: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].rows.push((index, identity));
        }

        let total = groups.len();
        progress.start(total);
        let mut regions = Vec::with_capacity(total);
        for (done, group) in groups.into_iter().enumerate() {
            let Some(region_name) = group.rows.first().map(|(_, identity)| identity.name.clone())
            else {
                continue;
            };
            let mut series = Vec::new();
            for (index, identity) in &group.rows {
                let row = &table.rows[*index];
                let converted = normalizer
                    .convert(row, identity)
                    .map_err(|source| row_error(*index, row, source))?;
                match converted {
                    Some(converted) if !converted.values.is_empty() => series.push(converted),
                    Some(converted) => {
                        debug!(
                            region = %group.code,
                            series = %converted.series_code,
                            "series has no values, discarded"
                        );
                    }
                    None => {}
                }
            }
            debug!(region = %group.code, series = series.len(), "region group converted");
            regions.push(RegionRecord {
                region_name,
                region_code: group.code,
                region_type: columns.region_type.clone(),
                series,
            });

            if progress.advance(done + 1).is_break() && done + 1 < total {
                info!(done = done + 1, total, "import cancelled");
                return Err(IngestError::Cancelled {
                    done: done + 1,
                    total,
                });
            }
        }
        progress.finish();

        let dataset = NormalizedDataset {
            report: self.config.report.clone(),
            agency: self.config.agency.clone(),
            namespace: self.config.namespace.clone(),
            regions,
        };
        info!(
            regions = dataset.regions.len(),
            series = dataset.series_count(),
            values = dataset.value_count(),
            "table imported"
        );
        Ok(dataset)
    }

    /// Reads a delimited text file and imports it.
    pub fn import_path(&self, path: &Path, progress: &mut dyn ProgressObserver) -> Result<NormalizedDataset> {
        let table = read_table(path)?;
        self.import_with_progress(&table, progress)
    }
}
