use std::fs;
use std::path::{Path, PathBuf};

use regions_cli::cli::{BootstrapArgs, ColumnsArgs, FormatArgs, IdentifyArgs, ImportArgs};
use regions_cli::commands::{
    format_output_path, run_bootstrap, run_columns, run_format, run_identify, run_import,
};
use regions_cli::summary::identifications_json;
use regions_map::ColumnRole;
use regions_store::{MemoryStore, ReferenceStore};
use tempfile::TempDir;

const ISO_TABLE: &str = "official_name_en\tISO3166-1-Alpha-2\tISO3166-1-Alpha-3\tM49\tis_independent
United Kingdom of Great Britain and Northern Ireland\tGB\tGBR\t826\tYes
United States of America\tUS\tUSA\t840\tYes
Puerto Rico\tPR\tPRI\t630\tTerritory of US
";

const ALIASES: &str = "regionCode,regionName
GBR,United Kingdom
USA,United States
";

const WEO_TABLE: &str = "ISO,Country,WEO Subject Code,Subject Descriptor,Subject Notes,Units,Scale,Country/Series-specific Notes,2019,2020
PRI,Puerto Rico,LP,Population,Mid-year population,Persons,Millions,,3.19,3.16
GBR,United Kingdom,LP,Population,Mid-year population,Persons,Millions,,66.8,67.1
";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn bootstrap(dir: &TempDir) -> PathBuf {
    let store = dir.path().join("store.json");
    let args = BootstrapArgs {
        iso: Some(write(dir, "iso.tsv", ISO_TABLE)),
        usps: None,
        aliases: Some(write(dir, "aliases.csv", ALIASES)),
        no_scales: false,
    };
    run_bootstrap(&store, &args).expect("bootstrap");
    store
}

fn identify_args(inputs: &[&str]) -> IdentifyArgs {
    IdentifyArgs {
        inputs: inputs.iter().map(|s| (*s).to_string()).collect(),
        namespace: None,
        threshold: None,
        candidates: 0,
        json: false,
    }
}

const CODES_TABLE: &str = "countryCode,countryName
GB,United Kingdm
USA,United States
XX,Atlantis
";

fn format_args(table: &Path) -> FormatArgs {
    FormatArgs {
        table: table.to_path_buf(),
        output: None,
        column: "countryCode".to_string(),
        namespace: None,
        fuzzy: 0.0,
    }
}

fn import_args(table: &Path, config: Option<PathBuf>) -> ImportArgs {
    ImportArgs {
        table: table.to_path_buf(),
        config,
        output: None,
        resolve: false,
        strict: false,
        namespace: None,
        register: false,
        json_compatible: false,
        no_progress: true,
        pretty: false,
    }
}

#[test]
fn bootstrap_writes_a_loadable_store() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("nested").join("store.json");
    let args = BootstrapArgs {
        iso: Some(write(&dir, "iso.tsv", ISO_TABLE)),
        usps: None,
        aliases: Some(write(&dir, "aliases.csv", ALIASES)),
        no_scales: false,
    };
    let report = run_bootstrap(&store_path, &args).unwrap();
    assert_eq!(report.imports.len(), 2);
    assert_eq!(report.regions, 3);
    assert_eq!(report.imports[1].aliases_added, 2);
    assert!(report.scales.is_some_and(|count| count > 0));

    let store = MemoryStore::load(&store_path).unwrap();
    assert_eq!(store.region_count(), 3);
    let gbr = store.get_region("GBR").unwrap().expect("GBR");
    assert!(gbr.is_known_as("United Kingdom"));
}

#[test]
fn identify_resolves_codes_and_names() {
    let dir = TempDir::new().unwrap();
    let store = bootstrap(&dir);

    let results = run_identify(&store, &identify_args(&["GB", "puerto rico", "Qwxzv"])).unwrap();
    let codes: Vec<Option<&str>> = results
        .iter()
        .map(|r| r.resolution.as_ref().map(|res| res.region_code.as_str()))
        .collect();
    assert_eq!(codes, vec![Some("GBR"), Some("PRI"), None]);

    let json = identifications_json(&results);
    assert_eq!(json[1]["regionName"], "puerto rico");
    assert!(json[2]["regionCode"].is_null());
}

#[test]
fn identify_lists_candidates_on_request() {
    let dir = TempDir::new().unwrap();
    let store = bootstrap(&dir);
    let mut args = identify_args(&["United Kingdom"]);
    args.candidates = 2;

    let results = run_identify(&store, &args).unwrap();
    assert_eq!(results[0].candidates.len(), 2);
    assert_eq!(results[0].candidates[0].alias, "United Kingdom");
}

#[test]
fn identify_needs_a_bootstrapped_store() {
    let dir = TempDir::new().unwrap();
    let err = run_identify(&dir.path().join("absent.json"), &identify_args(&["GB"])).unwrap_err();
    assert!(err.to_string().contains("run `regions bootstrap` first"));
}

#[test]
fn identify_rejects_out_of_range_thresholds() {
    let dir = TempDir::new().unwrap();
    let store = bootstrap(&dir);
    let mut args = identify_args(&["GB"]);
    args.threshold = Some(120.0);
    let err = run_identify(&store, &args).unwrap_err();
    insta::assert_snapshot!(err, @"threshold must be between 0 and 100, got 120");
}

#[test]
fn columns_reports_missing_roles() {
    let dir = TempDir::new().unwrap();
    let table = write(&dir, "partial.csv", "regionCode,regionName,1990\nPRI,Puerto Rico,3.5\n");
    let report = run_columns(&ColumnsArgs { table, config: None }).unwrap();

    assert!(report.missing.contains(&ColumnRole::SeriesCode));
    assert!(!report.missing.contains(&ColumnRole::Notes));
    assert_eq!(report.time_columns, vec!["1990"]);
    let region_code = report
        .roles
        .iter()
        .find(|r| r.role == ColumnRole::RegionCode)
        .unwrap();
    assert_eq!(region_code.source.as_deref(), Some("'regionCode'"));
}

#[test]
fn columns_accepts_a_preset_config() {
    let dir = TempDir::new().unwrap();
    let table = write(&dir, "weo.csv", WEO_TABLE);
    let config = write(&dir, "weo.json", r#"{"preset": "weo"}"#);
    let report = run_columns(&ColumnsArgs {
        table,
        config: Some(config),
    })
    .unwrap();
    assert!(report.missing.is_empty());
    assert_eq!(report.time_columns, vec!["2019", "2020"]);
    assert_eq!(report.region_type, "country");
}

#[test]
fn import_writes_the_dataset_file() {
    let dir = TempDir::new().unwrap();
    let table = write(&dir, "weo.csv", WEO_TABLE);
    let config = write(&dir, "weo.json", r#"{"preset": "weo"}"#);
    let output = dir.path().join("out").join("dataset.json");
    let mut args = import_args(&table, Some(config));
    args.output = Some(output.clone());

    let outcome = run_import(&dir.path().join("unused.json"), &args).unwrap();
    assert_eq!(outcome.dataset.regions.len(), 2);
    assert!(outcome.registered.is_none());

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["regions"][0]["regionCode"], "PRI");
    assert_eq!(written["regions"][1]["series"][0]["scale"], "mega");
}

#[test]
fn import_resolves_against_the_store() {
    let dir = TempDir::new().unwrap();
    let store = bootstrap(&dir);
    let table = write(
        &dir,
        "weo.csv",
        &WEO_TABLE.replace("PRI,Puerto Rico", "PR,Puerto Rico"),
    );
    let config = write(&dir, "weo.json", r#"{"preset": "weo"}"#);
    let mut args = import_args(&table, Some(config));
    args.resolve = true;
    args.output = Some(dir.path().join("dataset.json"));

    let outcome = run_import(&store, &args).unwrap();
    let codes: Vec<&str> = outcome
        .dataset
        .regions
        .iter()
        .map(|r| r.region_code.as_str())
        .collect();
    assert_eq!(codes, vec!["PRI", "GBR"]);
}

#[test]
fn strict_import_fails_on_unknown_regions() {
    let dir = TempDir::new().unwrap();
    let store = bootstrap(&dir);
    let table = write(
        &dir,
        "weo.csv",
        &WEO_TABLE.replace("PRI,Puerto Rico", "XXA,Atlantis"),
    );
    let config = write(&dir, "weo.json", r#"{"preset": "weo"}"#);
    let mut args = import_args(&table, Some(config));
    args.strict = true;
    args.output = Some(dir.path().join("dataset.json"));

    let err = run_import(&store, &args).unwrap_err();
    assert!(format!("{err:#}").contains("XXA"));
    assert!(!dir.path().join("dataset.json").exists());
}

#[test]
fn import_registers_new_regions() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("fresh.json");
    let table = write(&dir, "weo.csv", WEO_TABLE);
    let config = write(&dir, "weo.json", r#"{"preset": "weo"}"#);
    let mut args = import_args(&table, Some(config));
    args.namespace = Some("WEO".to_string());
    args.register = true;
    args.output = Some(dir.path().join("dataset.json"));

    let outcome = run_import(&store_path, &args).unwrap();
    let registered = outcome.registered.expect("registration summary");
    assert_eq!(registered.regions_added, 2);
    assert_eq!(registered.codes_added, 2);

    let store = MemoryStore::load(&store_path).unwrap();
    assert!(store.get_code("WEO", "PRI").unwrap().is_some());
}

#[test]
fn format_adds_a_region_code_column() {
    let dir = TempDir::new().unwrap();
    let store = bootstrap(&dir);
    let table = write(&dir, "codes.csv", CODES_TABLE);

    let outcome = run_format(&store, &format_args(&table)).unwrap();
    assert_eq!(outcome.output, dir.path().join("codes.edited.tsv"));
    assert_eq!(outcome.resolved, 2);
    assert_eq!(outcome.unresolved, vec!["XX".to_string()]);
    assert_eq!(
        fs::read_to_string(&outcome.output).unwrap(),
        "countryCode\tcountryName\tregionCode\n\
         GB\tUnited Kingdm\tGBR\n\
         USA\tUnited States\tUSA\n\
         XX\tAtlantis\t\n"
    );
}

#[test]
fn format_matches_names_fuzzily_only_on_request() {
    let dir = TempDir::new().unwrap();
    let store = bootstrap(&dir);
    let table = write(&dir, "codes.csv", CODES_TABLE);
    let mut args = format_args(&table);
    args.column = "countryName".to_string();

    let outcome = run_format(&store, &args).unwrap();
    assert_eq!(outcome.resolved, 1);
    assert!(outcome.unresolved.contains(&"United Kingdm".to_string()));

    args.fuzzy = 80.0;
    let outcome = run_format(&store, &args).unwrap();
    assert_eq!(outcome.resolved, 2);
    assert_eq!(outcome.unresolved, vec!["Atlantis".to_string()]);
}

#[test]
fn format_rejects_unknown_columns() {
    let dir = TempDir::new().unwrap();
    let store = bootstrap(&dir);
    let table = write(&dir, "codes.csv", CODES_TABLE);
    let mut args = format_args(&table);
    args.column = "iso".to_string();

    let err = run_format(&store, &args).unwrap_err();
    assert_eq!(
        err.to_string(),
        "'iso' is not a valid column. Expected one of [countryCode, countryName]"
    );
}

#[test]
fn format_writes_into_output_directories() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("data").join("codes.tsv");
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();

    assert_eq!(format_output_path(&table, Some(&out)), out.join("codes.tsv"));
    assert_eq!(
        format_output_path(&table, None),
        dir.path().join("data").join("codes.edited.tsv")
    );
    let explicit = dir.path().join("result.csv");
    assert_eq!(format_output_path(&table, Some(&explicit)), explicit);
}
