use locstack::core::error::LocstackError;
use locstack::core::host::MemoryHost;
use locstack::core::ident::LAST;
use locstack::core::snapshot::{
    delete_snapshot, export_snapshot, import_snapshot, list_snapshots, snapshot_path,
};
use locstack::core::store::{Entries, LocationStore};
use std::fs;
use tempfile::tempdir;

fn s(v: &str) -> String {
    v.to_string()
}

fn sample_store() -> LocationStore {
    let host = MemoryHost::new("/home/me", ["/srv/a", "/srv/b"]);
    let mut store = LocationStore::seeded("/home/me");
    store.add(&host, "a", Some("/srv/a"), false).unwrap();
    store.add(&host, "b", Some("/srv/b"), false).unwrap();
    store
}

#[test]
fn export_then_import_round_trips() {
    let tmp = tempdir().expect("tempdir");
    let original = sample_store();

    let path = export_snapshot(tmp.path(), &original, Some("x"), true).unwrap();
    assert_eq!(path, tmp.path().join("locstack_x.json"));

    let mut store = original.clone();
    store.clear(true);
    let imported = import_snapshot(tmp.path(), &mut store, Some("x"), true, false).unwrap();
    assert_eq!(imported.count, 3);
    assert_eq!(store.entries(), original.entries());
}

#[test]
fn default_name_uses_bare_file() {
    let tmp = tempdir().expect("tempdir");
    export_snapshot(tmp.path(), &sample_store(), None, false).unwrap();
    assert!(tmp.path().join("locstack.json").exists());

    let content = fs::read_to_string(tmp.path().join("locstack.json")).unwrap();
    let parsed: Entries = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.get("a").map(String::as_str), Some("/srv/a"));
}

#[test]
fn existing_snapshot_needs_force() {
    let tmp = tempdir().expect("tempdir");
    let first = LocationStore::from_entries(Entries::from([(s("old"), s("/old"))]));
    export_snapshot(tmp.path(), &first, Some("w"), false).unwrap();

    let err = export_snapshot(tmp.path(), &sample_store(), Some("w"), false).unwrap_err();
    assert!(matches!(err, LocstackError::SnapshotExists(_)));
    assert!(!err.is_fatal());
    let content = fs::read_to_string(snapshot_path(tmp.path(), "w")).unwrap();
    assert!(content.contains("/old"));

    export_snapshot(tmp.path(), &sample_store(), Some("w"), true).unwrap();
    let content = fs::read_to_string(snapshot_path(tmp.path(), "w")).unwrap();
    assert!(!content.contains("/old"));
}

#[test]
fn invalid_snapshot_name_is_fatal() {
    let tmp = tempdir().expect("tempdir");
    let err = export_snapshot(tmp.path(), &sample_store(), Some("../x"), true).unwrap_err();
    assert!(matches!(err, LocstackError::InvalidSnapshotName(_)));
    assert!(err.is_fatal());
}

#[test]
fn import_requires_force_and_leaves_store_alone() {
    let tmp = tempdir().expect("tempdir");
    export_snapshot(tmp.path(), &sample_store(), Some("x"), false).unwrap();

    let mut store = LocationStore::from_entries(Entries::from([(s("keep"), s("/keep"))]));
    let err = import_snapshot(tmp.path(), &mut store, Some("x"), false, false).unwrap_err();
    assert!(matches!(err, LocstackError::ConfirmationRequired(_)));
    assert_eq!(store.get("keep"), Some("/keep"));
    assert_eq!(store.len(), 1);
}

#[test]
fn import_of_missing_snapshot_is_reported() {
    let tmp = tempdir().expect("tempdir");
    let mut store = LocationStore::new();
    let err = import_snapshot(tmp.path(), &mut store, Some("ghost"), true, false).unwrap_err();
    assert!(matches!(err, LocstackError::SnapshotNotFound(ref n) if n == "ghost"));
    assert!(!store.is_initialized());
}

#[test]
fn corrupt_snapshot_is_fatal() {
    let tmp = tempdir().expect("tempdir");
    fs::write(snapshot_path(tmp.path(), "bad"), "{ not json").unwrap();
    let mut store = sample_store();
    let before = store.clone();
    let err = import_snapshot(tmp.path(), &mut store, Some("bad"), true, false).unwrap_err();
    assert!(matches!(err, LocstackError::CorruptSnapshot { .. }));
    assert!(err.is_fatal());
    assert_eq!(store, before);
}

#[test]
fn merge_import_keeps_existing_entries() {
    let tmp = tempdir().expect("tempdir");
    let snap = LocationStore::from_entries(Entries::from([
        (s("c"), s("/srv/c")),
        (s("again"), s("/srv/a")),
    ]));
    export_snapshot(tmp.path(), &snap, Some("m"), false).unwrap();

    let mut store = sample_store();
    let imported = import_snapshot(tmp.path(), &mut store, Some("m"), true, true).unwrap();
    assert!(imported.merged);
    assert_eq!(store.get("c"), Some("/srv/c"));
    assert_eq!(store.get("again"), Some("/srv/a"));
    assert_eq!(store.get("a"), None, "re-keyed by the merged entry");
    assert_eq!(store.get("b"), Some("/srv/b"));
    assert_eq!(store.get(LAST), Some("/home/me"));
}

#[test]
fn list_de_aliases_and_filters_names() {
    let tmp = tempdir().expect("tempdir");
    let store = sample_store();
    for name in [None, Some("work"), Some("work2"), Some("home")] {
        export_snapshot(tmp.path(), &store, name, true).unwrap();
    }
    fs::write(tmp.path().join("locstack_default.json"), "{}").unwrap();
    fs::write(tmp.path().join("notes.json"), "{}").unwrap();
    fs::create_dir(tmp.path().join("locstack_dir.json")).unwrap();

    let all = list_snapshots(tmp.path(), &[]).unwrap();
    assert_eq!(all.names, vec![s("default"), s("home"), s("work"), s("work2")]);

    let work = list_snapshots(tmp.path(), &[s("work*"), s("bad_pattern")]).unwrap();
    assert_eq!(work.names, vec![s("work"), s("work2")]);
    assert_eq!(work.rejected, vec![s("bad_pattern")]);
}

#[test]
fn list_on_missing_directory_is_empty() {
    let tmp = tempdir().expect("tempdir");
    let listing = list_snapshots(&tmp.path().join("nope"), &[]).unwrap();
    assert!(listing.names.is_empty());
}

#[test]
fn delete_needs_force_and_an_existing_file() {
    let tmp = tempdir().expect("tempdir");
    export_snapshot(tmp.path(), &sample_store(), Some("gone"), false).unwrap();

    let err = delete_snapshot(tmp.path(), "gone", false).unwrap_err();
    assert!(matches!(err, LocstackError::ConfirmationRequired(_)));
    assert!(snapshot_path(tmp.path(), "gone").exists());

    delete_snapshot(tmp.path(), "gone", true).unwrap();
    assert!(!snapshot_path(tmp.path(), "gone").exists());

    let err = delete_snapshot(tmp.path(), "gone", true).unwrap_err();
    assert!(matches!(err, LocstackError::SnapshotNotFound(_)));
}

#[test]
fn merge_takes_last_from_the_snapshot() {
    let tmp = tempdir().expect("tempdir");
    let snap = LocationStore::from_entries(Entries::from([
        (s(LAST), s("/elsewhere")),
        (s("c"), s("/srv/c")),
    ]));
    export_snapshot(tmp.path(), &snap, Some("m"), false).unwrap();

    let mut store = sample_store();
    import_snapshot(tmp.path(), &mut store, Some("m"), true, true).unwrap();
    assert_eq!(store.get(LAST), Some("/elsewhere"));
    assert_eq!(store.get("a"), Some("/srv/a"));
}

#[test]
fn export_creates_the_snapshot_directory() {
    let tmp = tempdir().expect("tempdir");
    let dir = tmp.path().join("nested").join("snaps");
    let path = export_snapshot(&dir, &sample_store(), Some("x"), false).unwrap();
    assert_eq!(path, dir.join("locstack_x.json"));
    assert!(path.is_file());
}

#[test]
fn empty_initialized_store_exports_an_empty_object() {
    let tmp = tempdir().expect("tempdir");
    let path = export_snapshot(tmp.path(), &LocationStore::from_entries(Entries::new()), None, false)
        .unwrap();
    assert_eq!(fs::read_to_string(path).unwrap().trim(), "{}");

    let err = export_snapshot(tmp.path(), &LocationStore::new(), Some("u"), false).unwrap_err();
    assert!(matches!(err, LocstackError::EmptyStore));
}
