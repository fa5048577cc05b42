use shelf_store::{CatalogStore, PlanogramDraft, PlanogramSource, StoreError};
use std::path::PathBuf;

fn temp_catalog(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("shelfsnap-{}-{}", tag, shelf_store::new_id()));
    dir.join("catalog.json")
}

#[test]
fn built_planogram_survives_reopen() {
    let path = temp_catalog("reopen");
    let mut store = CatalogStore::open(&path).unwrap();
    assert!(store.planograms().unwrap().is_empty());

    let mut draft = PlanogramDraft::new(2, 2).unwrap();
    draft.set(1, 1, Some("bread".into())).unwrap();
    draft.set(0, 0, Some("milk".into())).unwrap();
    let (planogram, items) = draft.build("Bakery", None);
    let id = planogram.id.clone();
    store.insert_planogram(planogram, items).unwrap();

    let reopened = CatalogStore::open(&path).unwrap();
    let p = reopened.planogram(&id).unwrap();
    assert_eq!(p.name, "Bakery");
    assert_eq!(p.shelf_width_mm, 800);

    let items = reopened.items(&id).unwrap();
    let products: Vec<&str> = items.iter().map(|i| i.product_id.as_str()).collect();
    assert_eq!(products, vec!["milk", "bread"]);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn duplicate_planogram_is_refused() {
    let path = temp_catalog("dup");
    let mut store = CatalogStore::open(&path).unwrap();
    let (planogram, items) = PlanogramDraft::default().build("Empty", None);
    store.insert_planogram(planogram.clone(), items).unwrap();

    match store.insert_planogram(planogram, vec![]) {
        Err(StoreError::Duplicate(id)) => assert!(!id.is_empty()),
        other => panic!("expected duplicate error, got {other:?}"),
    }
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn malformed_catalog_reports_path() {
    let path = temp_catalog("bad");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let err = CatalogStore::open(&path).err().expect("malformed catalog must fail");
    assert!(matches!(err, StoreError::Json { .. }));
    assert!(err.to_string().contains("catalog.json"));
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn failed_write_leaves_store_unchanged() {
    let path = temp_catalog("fail");
    let mut store = CatalogStore::open(&path).unwrap();
    // a directory where the temp file should go makes the write fail
    let tmp = path.with_extension("json.tmp");
    std::fs::create_dir_all(&tmp).unwrap();

    let (planogram, items) = PlanogramDraft::default().build("Retry", None);
    let err = store.insert_planogram(planogram.clone(), items.clone()).unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(store.planograms().unwrap().is_empty());
    assert!(store.add_products(shelf_store::sample_products()).is_err());
    assert!(store.products().unwrap().is_empty());

    std::fs::remove_dir(&tmp).unwrap();
    store.insert_planogram(planogram.clone(), items).unwrap();
    assert_eq!(store.planogram(&planogram.id).unwrap().name, "Retry");
    assert!(CatalogStore::open(&path).unwrap().planogram(&planogram.id).is_ok());
    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
