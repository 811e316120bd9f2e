use std::fs;
use std::path::{Path, PathBuf};

use regions_store::{
    ISO_ALPHA2, ISO_ALPHA3, ISO_NUMERIC, MemoryStore, ReferenceStore, StoreError, UNITED_STATES,
    USPS, import_aliases, import_iso, import_usps, install_default_scales,
};

const ISO_TABLE: &str = "\u{feff}official_name_en\tISO3166-1-Alpha-2\tISO3166-1-Alpha-3\tM49\tis_independent
United Kingdom of Great Britain and Northern Ireland\tGB\tGBR\t826\tYes
United States of America\tUS\tUSA\t840\tYes
Puerto Rico\tPR\tPRI\t630\tTerritory of US
Afghanistan\tAF\tAFG\t4\tYes
Sark\t\t\t680\tPart of GG
";

const USPS_TABLE: &str = "usps\tregionName\tregionType
TX\tTexas\tstate
PR\tPuerto Rico\tterritory
DC\tDistrict of Columbia\tdistrict
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn iso_import_creates_namespaces_regions_and_codes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "country-codes.tsv", ISO_TABLE);
    let mut store = MemoryStore::new();

    let summary = import_iso(&mut store, &path).expect("import iso");
    assert_eq!(summary.rows, 5);
    assert_eq!(summary.regions_added, 5);
    // Sark has no alpha codes; every other row carries three.
    assert_eq!(summary.codes_added, 13);

    let names: Vec<String> = store
        .list_namespaces()
        .unwrap()
        .into_iter()
        .map(|n| n.name)
        .collect();
    assert_eq!(names, vec![ISO_ALPHA3, ISO_ALPHA2, ISO_NUMERIC]);

    let gbr = store.get_code(ISO_ALPHA3, "gbr").unwrap().expect("GBR");
    let uk = store.region(gbr.region).unwrap().unwrap();
    assert_eq!(uk.name, "United Kingdom of Great Britain and Northern Ireland");
    assert_eq!(uk.region_type, "country");

    let pri = store.get_region("PRI").unwrap().unwrap();
    assert_eq!(pri.region_type, "territory");

    let afg = store.get_code(ISO_NUMERIC, "004").unwrap().expect("zero padded");
    assert_eq!(store.region(afg.region).unwrap().unwrap().name, "Afghanistan");
    assert!(store.get_code(ISO_NUMERIC, "4").unwrap().is_none());

    let usa = store.get_code(ISO_ALPHA3, "USA").unwrap().unwrap();
    let namespace = store.get_namespace(ISO_ALPHA3).unwrap().unwrap();
    assert!(namespace.url.is_some());
    assert_eq!(store.region_code(usa.region, ISO_ALPHA2).unwrap().as_deref(), Some("US"));
}

#[test]
fn iso_import_is_safe_to_rerun() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "country-codes.tsv", ISO_TABLE);
    let mut store = MemoryStore::new();

    import_iso(&mut store, &path).unwrap();
    let again = import_iso(&mut store, &path).expect("second import");
    assert_eq!(again.regions_added, 0);
    assert_eq!(again.codes_added, 0);
    assert_eq!(store.region_count(), 5);
    assert_eq!(store.code_count(), 13);
}

#[test]
fn usps_import_links_states_to_the_iso_country() {
    let dir = tempfile::tempdir().unwrap();
    let iso = write(dir.path(), "country-codes.tsv", ISO_TABLE);
    let usps = write(dir.path(), "usps_codes.tsv", USPS_TABLE);
    let mut store = MemoryStore::new();
    import_iso(&mut store, &iso).unwrap();

    let summary = import_usps(&mut store, &usps).expect("import usps");
    // Puerto Rico already exists from the ISO table.
    assert_eq!(summary.regions_added, 2);
    assert_eq!(summary.codes_added, 3);

    let usa = store.get_region("USA").unwrap().unwrap();
    let texas = store.get_code(USPS, "tx").unwrap().unwrap();
    let texas = store.region(texas.region).unwrap().unwrap();
    assert_eq!(texas.parent, Some(usa.id));
    assert_eq!(texas.region_type, "state");

    let children: Vec<String> = store
        .subregions(usa.id)
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(children, vec!["Puerto Rico", "Texas", "District of Columbia"]);
    assert!(store.find_region_by_name(UNITED_STATES).unwrap().is_none());
}

#[test]
fn usps_import_creates_united_states_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let usps = write(dir.path(), "usps_codes.tsv", USPS_TABLE);
    let mut store = MemoryStore::new();

    let summary = import_usps(&mut store, &usps).unwrap();
    assert_eq!(summary.regions_added, 4);

    let us = store.find_region_by_name(UNITED_STATES).unwrap().unwrap();
    assert_eq!(us.region_type, "country");
    assert_eq!(store.subregions(us.id).unwrap().len(), 3);

    let again = import_usps(&mut store, &usps).unwrap();
    assert_eq!(again.regions_added, 0);
    assert_eq!(store.region_count(), 4);
}

#[test]
fn alias_import_registers_names_by_alpha3_code() {
    let dir = tempfile::tempdir().unwrap();
    let iso = write(dir.path(), "country-codes.tsv", ISO_TABLE);
    let aliases = write(
        dir.path(),
        "region_aliases.tsv",
        "regionCode\tregionName\nGBR\tUnited Kingdom\nGBR\tGreat Britain\nZZZ\tNowhere\nUSA\tUnited States of America\n",
    );
    let mut store = MemoryStore::new();
    import_iso(&mut store, &iso).unwrap();

    let summary = import_aliases(&mut store, &aliases).expect("import aliases");
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.aliases_added, 2);
    assert_eq!(summary.skipped, 1);

    let uk = store.get_region("GBR").unwrap().unwrap();
    assert_eq!(
        uk.aliases,
        vec![
            "United Kingdom of Great Britain and Northern Ireland",
            "United Kingdom",
            "Great Britain"
        ]
    );
}

#[test]
fn missing_header_names_the_namespace() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.csv", "official_name_en,M49\nFrance,250\n");
    let mut store = MemoryStore::new();

    let err = import_iso(&mut store, &path).unwrap_err();
    match &err {
        StoreError::Bootstrap {
            namespace, message, ..
        } => {
            assert_eq!(namespace, ISO_ALPHA3);
            assert_eq!(
                message,
                "missing columns: ISO3166-1-Alpha-2, ISO3166-1-Alpha-3, is_independent"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("ISO 3166-1 alpha-3"));
}

#[test]
fn invalid_numeric_code_is_a_bootstrap_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "codes.csv",
        "official_name_en,ISO3166-1-Alpha-2,ISO3166-1-Alpha-3,M49,is_independent\nFrance,FR,FRA,two fifty,Yes\n",
    );
    let mut store = MemoryStore::new();

    let err = import_iso(&mut store, &path).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Bootstrap { ref namespace, ref message, .. }
            if namespace == ISO_NUMERIC && message == "line 2: invalid M49 code 'two fifty'"
    ));
}

#[test]
fn missing_file_is_a_bootstrap_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = MemoryStore::new();
    let err = import_usps(&mut store, &dir.path().join("absent.tsv")).unwrap_err();
    assert!(matches!(err, StoreError::Bootstrap { ref namespace, .. } if namespace == USPS));
}

#[test]
fn default_scales_are_installed_once() {
    let mut store = MemoryStore::new();
    let count = install_default_scales(&mut store).unwrap();
    assert_eq!(count, 13);
    assert_eq!(install_default_scales(&mut store).unwrap(), 13);
    assert_eq!(store.get_scale("mega").unwrap().map(|s| s.multiplier), Some(1e6));
}
