use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use regions_ingest::{
    ImportConfig, IngestError, RegisterSummary, TableImporter, read_table, register_regions,
};
use regions_map::{ColumnRole, MappingError, detect_columns};
use regions_model::{NormalizedDataset, delimiter_for_path};
use regions_resolve::{Candidate, CodeResolver, Resolution, ResolverOptions};
use regions_store::{
    ImportSummary, MemoryStore, import_aliases, import_iso, import_usps, install_default_scales,
};

use crate::cli::{BootstrapArgs, ColumnsArgs, FormatArgs, IdentifyArgs, ImportArgs};
use crate::progress::BarProgress;

/// What `bootstrap` changed.
#[derive(Debug)]
pub struct BootstrapReport {
    pub store: PathBuf,
    pub imports: Vec<ImportSummary>,
    /// Scales known after installation, when installed.
    pub scales: Option<usize>,
    pub regions: usize,
    pub codes: usize,
}

pub fn run_bootstrap(store_path: &Path, args: &BootstrapArgs) -> Result<BootstrapReport> {
    let span = info_span!("bootstrap", store = %store_path.display());
    let _guard = span.enter();

    let mut store = MemoryStore::open(store_path)
        .with_context(|| format!("open reference store {}", store_path.display()))?;
    let mut imports = Vec::new();
    if let Some(path) = &args.iso {
        imports.push(import_iso(&mut store, path).context("import ISO 3166-1 table")?);
    }
    if let Some(path) = &args.usps {
        imports.push(import_usps(&mut store, path).context("import USPS table")?);
    }
    if let Some(path) = &args.aliases {
        imports.push(import_aliases(&mut store, path).context("import region aliases")?);
    }
    let scales = if args.no_scales {
        None
    } else {
        Some(install_default_scales(&mut store).context("install scales")?)
    };

    store
        .save(store_path)
        .with_context(|| format!("save reference store {}", store_path.display()))?;
    info!(
        regions = store.region_count(),
        codes = store.code_count(),
        "reference store saved"
    );
    Ok(BootstrapReport {
        store: store_path.to_path_buf(),
        imports,
        scales,
        regions: store.region_count(),
        codes: store.code_count(),
    })
}

/// One `identify` input and what it resolved to.
#[derive(Debug)]
pub struct Identification {
    pub input: String,
    pub resolution: Option<Resolution>,
    pub candidates: Vec<Candidate>,
}

pub fn run_identify(store_path: &Path, args: &IdentifyArgs) -> Result<Vec<Identification>> {
    let store = load_store(store_path)?;
    let mut options = ResolverOptions::default();
    if let Some(threshold) = args.threshold {
        if !(0.0..=100.0).contains(&threshold) {
            bail!("threshold must be between 0 and 100, got {threshold}");
        }
        options.threshold = threshold;
    }
    let resolver = CodeResolver::with_options(&store, options);

    let mut results = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let resolution = resolver
            .resolve(input, args.namespace.as_deref())
            .with_context(|| format!("resolve '{input}'"))?;
        let candidates = if args.candidates > 0 {
            resolver
                .candidates(input, args.candidates)
                .with_context(|| format!("score aliases for '{input}'"))?
        } else {
            Vec::new()
        };
        results.push(Identification {
            input: input.clone(),
            resolution,
            candidates,
        });
    }
    Ok(results)
}

/// How one role of a table was resolved.
#[derive(Debug)]
pub struct RoleSource {
    pub role: ColumnRole,
    /// Rendered source, when the role has one.
    pub source: Option<String>,
}

/// Output of `columns`.
#[derive(Debug)]
pub struct ColumnReport {
    pub table: PathBuf,
    pub roles: Vec<RoleSource>,
    pub time_columns: Vec<String>,
    pub region_type: String,
    /// Required roles without a source.
    pub missing: Vec<ColumnRole>,
}

pub fn run_columns(args: &ColumnsArgs) -> Result<ColumnReport> {
    let config = load_config(args.config.as_deref())?;
    let table = read_table(&args.table)?;
    let importer = TableImporter::new(&config);

    let detected = detect_columns(&table.columns, &config.column_overrides());
    let time_columns = detected
        .time_columns
        .iter()
        .map(|column| column.label.clone())
        .collect();

    match importer.columns(&table) {
        Ok(columns) => Ok(ColumnReport {
            table: args.table.clone(),
            roles: ColumnRole::ALL
                .into_iter()
                .map(|role| RoleSource {
                    role,
                    source: columns.source(role).as_ref().map(ToString::to_string),
                })
                .collect(),
            time_columns,
            region_type: columns.region_type,
            missing: Vec::new(),
        }),
        Err(IngestError::Columns(MappingError::MissingColumns { roles, .. })) => {
            Ok(ColumnReport {
                table: args.table.clone(),
                roles: ColumnRole::ALL
                    .into_iter()
                    .map(|role| RoleSource {
                        role,
                        source: (!roles.contains(&role))
                            .then(|| detected.label(role).map(|label| format!("'{label}'")))
                            .flatten(),
                    })
                    .collect(),
                time_columns,
                region_type: config
                    .region_type
                    .clone()
                    .unwrap_or(detected.region_type),
                missing: roles,
            })
        }
        Err(other) => Err(other.into()),
    }
}

/// Output of `import`.
#[derive(Debug)]
pub struct ImportOutcome {
    pub table: PathBuf,
    pub dataset: NormalizedDataset,
    /// Where the dataset JSON went; `None` means stdout.
    pub output: Option<PathBuf>,
    pub registered: Option<RegisterSummary>,
}

pub fn run_import(store_path: &Path, args: &ImportArgs) -> Result<ImportOutcome> {
    let span = info_span!("import", table = %args.table.display());
    let _guard = span.enter();

    let mut config = load_config(args.config.as_deref())?;
    config.resolve_regions |= args.resolve || args.strict;
    config.strict_resolution |= args.strict;
    config.json_compatible |= args.json_compatible;
    if let Some(namespace) = &args.namespace {
        config.namespace = Some(namespace.clone());
    }

    let mut store = if config.resolve_regions {
        Some(load_store(store_path)?)
    } else if args.register {
        Some(
            MemoryStore::open(store_path)
                .with_context(|| format!("open reference store {}", store_path.display()))?,
        )
    } else {
        None
    };

    let mut progress = if args.no_progress {
        BarProgress::hidden()
    } else {
        BarProgress::new(file_label(&args.table))
    };

    let dataset = {
        let resolver = store
            .as_ref()
            .filter(|_| config.resolve_regions)
            .map(|store| CodeResolver::with_options(store, config.resolver_options()));
        let mut importer = TableImporter::new(&config);
        if let Some(resolver) = &resolver {
            importer = importer.with_resolver(resolver);
        }
        importer
            .import_path(&args.table, &mut progress)
            .with_context(|| format!("import {}", args.table.display()))?
    };

    let registered = match (&mut store, args.register, config.namespace.as_deref()) {
        (Some(store), true, Some(namespace)) => {
            let summary = register_regions(store, &dataset, namespace, config.region_type.as_deref())
                .context("register regions")?;
            store
                .save(store_path)
                .with_context(|| format!("save reference store {}", store_path.display()))?;
            Some(summary)
        }
        _ => None,
    };

    write_dataset(&dataset, args.output.as_deref(), args.pretty)?;
    Ok(ImportOutcome {
        table: args.table.clone(),
        dataset,
        output: args.output.clone(),
        registered,
    })
}

/// Column added by `format`.
pub const REGION_CODE_COLUMN: &str = "regionCode";

/// Output of `format`.
#[derive(Debug)]
pub struct FormatOutcome {
    pub table: PathBuf,
    pub output: PathBuf,
    pub resolved: usize,
    /// Distinct values left without a code, in table order.
    pub unresolved: Vec<String>,
}

pub fn run_format(store_path: &Path, args: &FormatArgs) -> Result<FormatOutcome> {
    let span = info_span!("format", table = %args.table.display());
    let _guard = span.enter();

    if !(0.0..=100.0).contains(&args.fuzzy) {
        bail!("fuzzy score must be between 0 and 100, got {}", args.fuzzy);
    }
    let table = read_table(&args.table)?;
    if !table.columns.contains(&args.column) {
        bail!(
            "'{}' is not a valid column. Expected one of [{}]",
            args.column,
            table.columns.join(", ")
        );
    }

    let store = load_store(store_path)?;
    // Fuzzy matches must score above the threshold, so 100 disables them.
    let options = ResolverOptions {
        threshold: if args.fuzzy > 0.0 { args.fuzzy } else { 100.0 },
        ..ResolverOptions::default()
    };
    let resolver = CodeResolver::with_options(&store, options);

    let mut columns = table.columns.clone();
    if !columns.iter().any(|label| label == REGION_CODE_COLUMN) {
        columns.push(REGION_CODE_COLUMN.to_string());
    }
    let output = format_output_path(&args.table, args.output.as_deref());
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter_for_path(&output))
        .from_path(&output)
        .with_context(|| format!("create {}", output.display()))?;
    writer.write_record(&columns)?;

    let mut resolved = 0;
    let mut unresolved: Vec<String> = Vec::new();
    for row in &table.rows {
        let code = match row.text(&args.column) {
            Some(value) => {
                let hit = resolver
                    .resolve(&value, args.namespace.as_deref())
                    .with_context(|| format!("resolve '{value}'"))?;
                match hit {
                    Some(resolution) => {
                        resolved += 1;
                        resolution.region_code
                    }
                    None => {
                        if !unresolved.contains(&value) {
                            unresolved.push(value);
                        }
                        String::new()
                    }
                }
            }
            None => String::new(),
        };
        let record = columns.iter().map(|label| {
            if label == REGION_CODE_COLUMN {
                code.clone()
            } else {
                row.text(label).unwrap_or_default()
            }
        });
        writer.write_record(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("write {}", output.display()))?;
    info!(
        rows = table.len(),
        resolved,
        unresolved = unresolved.len(),
        output = %output.display(),
        "table formatted"
    );
    Ok(FormatOutcome {
        table: args.table.clone(),
        output,
        resolved,
        unresolved,
    })
}

/// `table.csv` becomes `table.edited.tsv`; a directory receives the input's file name.
pub fn format_output_path(table: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(dir) if dir.is_dir() => match table.file_name() {
            Some(name) => dir.join(name),
            None => dir.join("table.edited.tsv"),
        },
        Some(path) => path.to_path_buf(),
        None => table.with_extension("edited.tsv"),
    }
}

fn load_store(path: &Path) -> Result<MemoryStore> {
    if !path.exists() {
        bail!(
            "reference store {} not found; run `regions bootstrap` first",
            path.display()
        );
    }
    MemoryStore::load(path).with_context(|| format!("load reference store {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<ImportConfig> {
    match path {
        Some(path) => ImportConfig::from_path(path).context("load import config"),
        None => Ok(ImportConfig::default()),
    }
}

fn write_dataset(dataset: &NormalizedDataset, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(dataset)
    } else {
        serde_json::to_string(dataset)
    }
    .context("serialize dataset")?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create output directory {}", parent.display()))?;
            }
            fs::write(path, json).with_context(|| format!("write {}", path.display()))
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("table")
        .to_string()
}
