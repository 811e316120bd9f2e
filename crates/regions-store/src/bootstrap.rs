//! Bulk import of authoritative reference tables.
//!
//! Each import is safe to re-run: regions are matched by name before being
//! added, namespaces and scales are idempotent, and codes already bound to the
//! same region are accepted as-is.

use std::path::Path;
use std::time::Instant;

use regions_model::{NewNamespace, Region, STANDARD_SCALES, is_valid_code};
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::csv_utils::{get_field, read_csv_rows};
use crate::error::{Result, StoreError};
use crate::store::ReferenceStore;

pub const ISO_ALPHA2: &str = "ISO 3166-1 alpha-2";
pub const ISO_ALPHA3: &str = "ISO 3166-1 alpha-3";
pub const ISO_NUMERIC: &str = "ISO 3166-1 numeric";
pub const USPS: &str = "United States Postal Abbreviations";

const ISO_URL: &str = "https://www.iso.org/standard/63545.html";
const ISO_WIKI: &str = "https://en.wikipedia.org/wiki/List_of_ISO_3166_country_codes";
const ISO_DESCRIPTION: &str = "Codes for the representation of names of countries and their \
    subdivisions, Part 1: country codes for countries, dependent territories and special areas \
    of geographical interest.";

const ISO_NAME: &str = "official_name_en";
const ISO_ALPHA2_COLUMN: &str = "ISO3166-1-Alpha-2";
const ISO_ALPHA3_COLUMN: &str = "ISO3166-1-Alpha-3";
const ISO_NUMERIC_COLUMN: &str = "M49";
const ISO_INDEPENDENT: &str = "is_independent";

const USPS_CODE: &str = "usps";
const REGION_NAME: &str = "regionName";
const REGION_TYPE: &str = "regionType";
const REGION_CODE: &str = "regionCode";

/// Name of the parent created for postal regions when no "USA" region exists.
pub const UNITED_STATES: &str = "United States";

/// Counts reported by one bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub namespace: String,
    pub rows: usize,
    pub regions_added: usize,
    pub codes_added: usize,
    pub aliases_added: usize,
    pub skipped: usize,
}

impl ImportSummary {
    fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..Self::default()
        }
    }
}

fn iso_namespace(name: &str) -> NewNamespace {
    NewNamespace::new(name)
        .with_url(ISO_URL)
        .with_description(ISO_DESCRIPTION)
        .with_wiki(ISO_WIKI)
}

/// Imports the ISO 3166-1 country table.
///
/// Creates the alpha-2, alpha-3 and numeric namespaces. Independent entries
/// become "country" regions, the rest "territory". Numeric codes are
/// zero-padded to three digits; blank codes are skipped.
pub fn import_iso(store: &mut dyn ReferenceStore, path: &Path) -> Result<ImportSummary> {
    let span = info_span!("import_iso", path = %path.display());
    let _guard = span.enter();
    let start = Instant::now();

    let rows = read_csv_rows(
        path,
        ISO_ALPHA3,
        &[
            ISO_NAME,
            ISO_ALPHA2_COLUMN,
            ISO_ALPHA3_COLUMN,
            ISO_NUMERIC_COLUMN,
            ISO_INDEPENDENT,
        ],
    )?;
    for namespace in [ISO_ALPHA3, ISO_ALPHA2, ISO_NUMERIC] {
        store.add_namespace(iso_namespace(namespace))?;
    }

    let mut summary = ImportSummary::new(ISO_ALPHA3);
    for (index, row) in rows.iter().enumerate() {
        let line = index + 2;
        let name = get_field(row, ISO_NAME);
        if name.is_empty() {
            return Err(StoreError::bootstrap(
                ISO_ALPHA3,
                path,
                format!("line {line}: empty {ISO_NAME}"),
            ));
        }
        let region_type = if get_field(row, ISO_INDEPENDENT).eq_ignore_ascii_case("yes") {
            "country"
        } else {
            "territory"
        };
        let region = ensure_counted(store, name, region_type, &mut summary)?;

        let numeric = pad_numeric(get_field(row, ISO_NUMERIC_COLUMN)).map_err(|value| {
            StoreError::bootstrap(
                ISO_NUMERIC,
                path,
                format!("line {line}: invalid {ISO_NUMERIC_COLUMN} code '{value}'"),
            )
        })?;
        let codes = [
            (ISO_ALPHA2, get_field(row, ISO_ALPHA2_COLUMN).to_string()),
            (ISO_ALPHA3, get_field(row, ISO_ALPHA3_COLUMN).to_string()),
            (ISO_NUMERIC, numeric.unwrap_or_default()),
        ];
        for (namespace, value) in codes {
            add_code_counted(store, path, line, namespace, &region, &value, &mut summary)?;
        }
        summary.rows += 1;
    }

    info!(
        regions_added = summary.regions_added,
        codes_added = summary.codes_added,
        duration_ms = start.elapsed().as_millis(),
        "ISO import complete"
    );
    Ok(summary)
}

/// Imports the US postal abbreviation table.
///
/// Every imported region is parented to the region holding alpha-3 code
/// "USA", or to a "United States" country created on demand.
pub fn import_usps(store: &mut dyn ReferenceStore, path: &Path) -> Result<ImportSummary> {
    let span = info_span!("import_usps", path = %path.display());
    let _guard = span.enter();

    let rows = read_csv_rows(path, USPS, &[USPS_CODE, REGION_NAME, REGION_TYPE])?;
    store.add_namespace(
        NewNamespace::new(USPS)
            .with_url("https://www.stateabbreviations.us")
            .with_description("US Postal abbreviations are based on ISO 3166 subdivision codes.")
            .with_wiki("https://en.wikipedia.org/wiki/List_of_U.S._state_abbreviations"),
    )?;

    let mut summary = ImportSummary::new(USPS);
    let usa = match store.get_code(ISO_ALPHA3, "USA")? {
        Some(code) => store.require_region(code.region)?,
        None => ensure_counted(store, UNITED_STATES, "country", &mut summary)?,
    };
    debug!(parent = %usa.name, "postal regions parent");

    for (index, row) in rows.iter().enumerate() {
        let line = index + 2;
        let name = get_field(row, REGION_NAME);
        if name.is_empty() {
            return Err(StoreError::bootstrap(
                USPS,
                path,
                format!("line {line}: empty {REGION_NAME}"),
            ));
        }
        let region_type = match get_field(row, REGION_TYPE) {
            "" => "state",
            other => other,
        };
        let region = ensure_counted(store, name, region_type, &mut summary)?;
        if region.id != usa.id {
            store.set_parent(region.id, Some(usa.id)).map_err(|e| match e {
                e @ StoreError::CyclicParent { .. } => {
                    StoreError::bootstrap(USPS, path, format!("line {line}: {e}"))
                }
                other => other,
            })?;
        }
        add_code_counted(
            store,
            path,
            line,
            USPS,
            &region,
            get_field(row, USPS_CODE),
            &mut summary,
        )?;
        summary.rows += 1;
    }

    info!(
        regions_added = summary.regions_added,
        codes_added = summary.codes_added,
        "USPS import complete"
    );
    Ok(summary)
}

/// Imports alternate region names keyed by ISO alpha-3 code.
///
/// Rows whose code is unknown are skipped with a warning.
pub fn import_aliases(store: &mut dyn ReferenceStore, path: &Path) -> Result<ImportSummary> {
    let span = info_span!("import_aliases", path = %path.display());
    let _guard = span.enter();

    let rows = read_csv_rows(path, ISO_ALPHA3, &[REGION_CODE, REGION_NAME])?;
    let mut summary = ImportSummary::new(ISO_ALPHA3);
    for row in &rows {
        summary.rows += 1;
        let code = get_field(row, REGION_CODE);
        let alias = get_field(row, REGION_NAME);
        if alias.is_empty() || !is_valid_code(code) {
            summary.skipped += 1;
            continue;
        }
        let Some(found) = store.get_code(ISO_ALPHA3, code)? else {
            warn!(code, alias, "alias references unknown region code");
            summary.skipped += 1;
            continue;
        };
        let region = store.require_region(found.region)?;
        if !region.is_known_as(alias) {
            store.add_alias(region.id, alias)?;
            summary.aliases_added += 1;
        }
    }

    info!(aliases_added = summary.aliases_added, skipped = summary.skipped, "alias import complete");
    Ok(summary)
}

/// Registers the standard scale prefixes. Returns the number of scales known afterwards.
pub fn install_default_scales(store: &mut dyn ReferenceStore) -> Result<usize> {
    for (code, multiplier) in STANDARD_SCALES {
        store.add_scale(code, *multiplier)?;
    }
    Ok(store.list_scales()?.len())
}

fn ensure_counted(
    store: &mut dyn ReferenceStore,
    name: &str,
    region_type: &str,
    summary: &mut ImportSummary,
) -> Result<Region> {
    if let Some(existing) = store.find_region_by_name(name)? {
        return Ok(existing);
    }
    summary.regions_added += 1;
    store.add_region(name, region_type, None)
}

fn add_code_counted(
    store: &mut dyn ReferenceStore,
    path: &Path,
    line: usize,
    namespace: &str,
    region: &Region,
    value: &str,
    summary: &mut ImportSummary,
) -> Result<()> {
    if !is_valid_code(value) {
        return Ok(());
    }
    let already_bound = store
        .get_code(namespace, value)?
        .is_some_and(|code| code.region == region.id);
    match store.add_code(namespace, region.id, value) {
        Ok(Some(_)) if !already_bound => summary.codes_added += 1,
        Ok(_) => {}
        Err(e @ StoreError::CodeConflict { .. }) => {
            return Err(StoreError::bootstrap(
                namespace,
                path,
                format!("line {line}: {e}"),
            ));
        }
        Err(other) => return Err(other),
    }
    Ok(())
}

/// Zero-pads an M49 code to three digits.
///
/// Blank and `nan` values yield `Ok(None)`; other non-integral values are
/// returned as `Err` for reporting.
fn pad_numeric(raw: &str) -> std::result::Result<Option<String>, String> {
    if !is_valid_code(raw) {
        return Ok(None);
    }
    match raw.trim().parse::<f64>() {
        Ok(value) if value >= 0.0 && value.fract() == 0.0 && value < 1000.0 => {
            Ok(Some(format!("{:03}", value as u32)))
        }
        _ => Err(raw.to_string()),
    }
}
