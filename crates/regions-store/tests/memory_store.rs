use proptest::prelude::*;
use regions_model::{NewNamespace, RegionId};
use regions_store::{MemoryStore, ReferenceStore, StoreError};

fn store_with_namespace(name: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.add_namespace(NewNamespace::new(name)).expect("add namespace");
    store
}

#[test]
fn get_code_matches_uppercase_values() {
    let mut store = store_with_namespace("ISO 3166-1 alpha-3");
    let region = store.add_region("Puerto Rico", "territory", None).unwrap();
    let code = store
        .add_code("ISO 3166-1 alpha-3", region.id, "pri")
        .unwrap()
        .expect("valid code");
    assert_eq!(code.value, "PRI");

    let found = store.get_code("ISO 3166-1 alpha-3", "PRI").unwrap();
    assert_eq!(found, Some(code.clone()));
    assert_eq!(store.get_code("ISO 3166-1 alpha-3", "Pri").unwrap(), Some(code));
}

#[test]
fn get_code_returns_none_for_absent_pairs() {
    let store = store_with_namespace("ns");
    assert_eq!(store.get_code("ns", "XYZ").unwrap(), None);
    assert_eq!(store.get_code("missing namespace", "XYZ").unwrap(), None);
    assert_eq!(store.get_code("ns", "").unwrap(), None);
}

#[test]
fn add_code_skips_blank_and_nan_values() {
    let mut store = store_with_namespace("ns");
    let region = store.add_region("Somewhere", "country", None).unwrap();
    assert_eq!(store.add_code("ns", region.id, "nan").unwrap(), None);
    assert_eq!(store.add_code("ns", region.id, "  ").unwrap(), None);
    assert!(store.list_codes("ns").unwrap().is_empty());
}

#[test]
fn add_code_is_idempotent_for_the_same_region() {
    let mut store = store_with_namespace("ns");
    let region = store.add_region("Texas", "state", None).unwrap();
    let first = store.add_code("ns", region.id, "TX").unwrap();
    let second = store.add_code("ns", region.id, "tx").unwrap();
    assert_eq!(first, second);
    assert_eq!(store.list_codes("ns").unwrap().len(), 1);
}

#[test]
fn add_code_rejects_codes_owned_by_another_region() {
    let mut store = store_with_namespace("ns");
    let georgia = store.add_region("Georgia", "state", None).unwrap();
    let other = store.add_region("Gabon", "country", None).unwrap();
    store.add_code("ns", georgia.id, "GA").unwrap();

    let err = store.add_code("ns", other.id, "GA").unwrap_err();
    insta::assert_snapshot!(err, @"code 'GA' in namespace 'ns' already belongs to region 'Georgia'");
}

#[test]
fn add_code_requires_known_namespace_and_region() {
    let mut store = store_with_namespace("ns");
    let region = store.add_region("Texas", "state", None).unwrap();
    let err = store.add_code("other", region.id, "TX").unwrap_err();
    assert!(matches!(err, StoreError::UnknownNamespace(name) if name == "other"));

    let err = store.add_code("ns", RegionId::new(42), "TX").unwrap_err();
    assert!(matches!(err, StoreError::UnknownRegion(id) if id.index() == 42));
}

#[test]
fn duplicate_region_error_names_the_region() {
    let mut store = MemoryStore::new();
    store.add_region("France", "country", None).unwrap();
    let err = store.add_region("France", "country", None).unwrap_err();
    insta::assert_snapshot!(err, @"region 'France' already exists");
}

#[test]
fn add_scale_keeps_the_first_multiplier() {
    let mut store = MemoryStore::new();
    store.add_scale("mega", 1e6).unwrap();
    let again = store.add_scale("mega", 42.0).unwrap();
    assert_eq!(again.multiplier, 1e6);

    let scales = store.list_scales().unwrap();
    assert_eq!(scales.len(), 1);
    assert_eq!(scales[0].code, "mega");
    assert_eq!(store.get_scale("MEGA").unwrap().map(|s| s.multiplier), Some(1e6));
}

#[test]
fn add_namespace_is_idempotent() {
    let mut store = MemoryStore::new();
    let first = store
        .add_namespace(NewNamespace::new("USPS").with_url("https://example.org"))
        .unwrap();
    let second = store.add_namespace(NewNamespace::new("USPS")).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.list_namespaces().unwrap().len(), 1);
}

#[test]
fn aliases_are_recorded_once_in_registration_order() {
    let mut store = MemoryStore::new();
    let uk = store.add_region("United Kingdom", "country", None).unwrap();
    let fr = store.add_region("France", "country", None).unwrap();
    store.add_alias(uk.id, "Great Britain").unwrap();
    store.add_alias(uk.id, "great britain").unwrap();
    store.add_alias(fr.id, "French Republic").unwrap();

    let aliases: Vec<String> = store
        .list_aliases()
        .unwrap()
        .into_iter()
        .map(|a| a.value)
        .collect();
    assert_eq!(
        aliases,
        vec!["United Kingdom", "France", "Great Britain", "French Republic"]
    );
    let uk = store.region(uk.id).unwrap().unwrap();
    assert_eq!(uk.aliases, vec!["United Kingdom", "Great Britain"]);
}

#[test]
fn get_region_checks_names_before_codes() {
    let mut store = store_with_namespace("ISO 3166-1 alpha-2");
    let chad = store.add_region("Chad", "country", None).unwrap();
    let td = store.add_region("TD", "territory", None).unwrap();
    store.add_code("ISO 3166-1 alpha-2", chad.id, "TD").unwrap();

    assert_eq!(store.get_region("td").unwrap().map(|r| r.id), Some(td.id));
    assert_eq!(store.get_region("chad").unwrap().map(|r| r.id), Some(chad.id));
    assert!(store.get_region("nowhere").unwrap().is_none());
}

#[test]
fn get_region_falls_back_to_codes_in_namespace_order() {
    let mut store = MemoryStore::new();
    store.add_namespace(NewNamespace::new("first")).unwrap();
    store.add_namespace(NewNamespace::new("second")).unwrap();
    let a = store.add_region("Alpha", "country", None).unwrap();
    let b = store.add_region("Beta", "country", None).unwrap();
    store.add_code("second", b.id, "XX").unwrap();
    store.add_code("first", a.id, "XX").unwrap();

    assert_eq!(store.get_region("xx").unwrap().map(|r| r.id), Some(a.id));
}

#[test]
fn subregions_are_derived_from_parents() {
    let mut store = MemoryStore::new();
    let usa = store.add_region("United States", "country", None).unwrap();
    let texas = store.add_region("Texas", "state", Some(usa.id)).unwrap();
    let ohio = store.add_region("Ohio", "state", None).unwrap();
    store.set_parent(ohio.id, Some(usa.id)).unwrap();

    let names: Vec<String> = store
        .subregions(usa.id)
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Texas", "Ohio"]);
    assert!(store.subregions(texas.id).unwrap().is_empty());
}

#[test]
fn set_parent_rejects_cycles() {
    let mut store = MemoryStore::new();
    let country = store.add_region("Country", "country", None).unwrap();
    let state = store.add_region("State", "state", Some(country.id)).unwrap();
    let county = store.add_region("County", "county", Some(state.id)).unwrap();

    let err = store.set_parent(country.id, Some(county.id)).unwrap_err();
    insta::assert_snapshot!(err, @"setting parent 'County' on region 'Country' would create a cycle");
    assert!(store.set_parent(state.id, Some(state.id)).is_err());
    assert_eq!(store.region(country.id).unwrap().unwrap().parent, None);
}

#[test]
fn region_code_reads_one_namespace() {
    let mut store = MemoryStore::new();
    store.add_namespace(NewNamespace::new("alpha-2")).unwrap();
    store.add_namespace(NewNamespace::new("alpha-3")).unwrap();
    let uk = store.add_region("United Kingdom", "country", None).unwrap();
    store.add_code("alpha-2", uk.id, "GB").unwrap();
    store.add_code("alpha-3", uk.id, "GBR").unwrap();

    assert_eq!(store.region_code(uk.id, "alpha-3").unwrap().as_deref(), Some("GBR"));
    assert_eq!(store.region_code(uk.id, "alpha-2").unwrap().as_deref(), Some("GB"));
    assert_eq!(store.region_code(uk.id, "numeric").unwrap(), None);
}

#[test]
fn ensure_region_reuses_existing_names() {
    let mut store = MemoryStore::new();
    let first = store.ensure_region("United States", "country").unwrap();
    let second = store.ensure_region("united states", "territory").unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.region_type, "country");
    assert_eq!(store.region_count(), 1);
}

#[test]
fn snapshot_round_trips_through_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("store.json");

    let mut store = store_with_namespace("ns");
    let usa = store.add_region("United States", "country", None).unwrap();
    let texas = store.add_region("Texas", "state", Some(usa.id)).unwrap();
    store.add_code("ns", texas.id, "TX").unwrap();
    store.add_alias(texas.id, "Lone Star State").unwrap();
    store.add_scale("kilo", 1e3).unwrap();
    store.save(&path).expect("save snapshot");

    let loaded = MemoryStore::load(&path).expect("load snapshot");
    assert_eq!(loaded.get_code("ns", "tx").unwrap().map(|c| c.region), Some(texas.id));
    assert_eq!(
        loaded.find_region_by_name("texas").unwrap().and_then(|r| r.parent),
        Some(usa.id)
    );
    assert_eq!(loaded.list_aliases().unwrap().len(), 3);
    assert!(loaded.get_scale("kilo").unwrap().is_some());
}

#[test]
fn open_starts_empty_without_a_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = MemoryStore::open(&dir.path().join("absent.json")).expect("open");
    assert_eq!(store.region_count(), 0);
}

#[test]
fn load_reports_invalid_snapshots() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{not json").unwrap();
    let err = MemoryStore::load(&path).unwrap_err();
    assert!(matches!(err, StoreError::Snapshot { .. }));
}

#[test]
fn store_is_usable_as_a_trait_object() {
    let mut store = MemoryStore::new();
    let dynamic: &mut dyn ReferenceStore = &mut store;
    dynamic.add_region("Ohio", "state", None).unwrap();
    assert!(dynamic.get_region("OHIO").unwrap().is_some());
}

proptest! {
    #[test]
    fn inserted_codes_are_found_by_uppercase_value(
        values in proptest::collection::btree_set("[a-m]{1,3}[0-9]?", 1..20)
    ) {
        let mut store = store_with_namespace("ns");
        let region = store.add_region("Somewhere", "country", None).unwrap();
        for value in &values {
            store.add_code("ns", region.id, value).unwrap();
        }
        for value in &values {
            let found = store.get_code("ns", &value.to_uppercase()).unwrap();
            prop_assert_eq!(found.map(|c| c.region), Some(region.id));
        }
        prop_assert!(store.get_code("ns", "not-inserted!").unwrap().is_none());
    }

    #[test]
    fn add_scale_twice_keeps_one_record(code in "[a-z]{1,8}", first in 0.001f64..1e9, second in 0.001f64..1e9) {
        let mut store = MemoryStore::new();
        store.add_scale(&code, first).unwrap();
        store.add_scale(&code, second).unwrap();
        let scales = store.list_scales().unwrap();
        prop_assert_eq!(scales.len(), 1);
        prop_assert_eq!(scales[0].multiplier, first);
    }
}
