use locstack::core::error::{LocstackError, Severity};
use locstack::core::host::MemoryHost;
use locstack::core::ident::LAST;
use locstack::core::store::{Cleared, Entries, LocationStore, Removal};
use std::collections::HashSet;

fn s(v: &str) -> String {
    v.to_string()
}

fn host() -> MemoryHost {
    MemoryHost::new(
        "/home/me",
        ["/a", "/b", "/c", "/d", "/e", "/srv/proj1", "/srv/proj2"],
    )
}

fn assert_unique_paths(store: &LocationStore) {
    let entries = store.entries().expect("initialized");
    let paths: HashSet<&String> = entries.values().collect();
    assert_eq!(paths.len(), entries.len(), "duplicate path in {:?}", entries);
}

#[test]
fn paths_stay_unique_across_add_sequences() {
    let host = host();
    let ids = ["a", "b", "c", "d", "x_1"];
    let dirs = ["/a", "/b", "/c", "/d", "/e"];
    let mut store = LocationStore::new();

    // Deterministic LCG so the sequence is reproducible.
    let mut seed: u64 = 0x5eed;
    for _ in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let id = ids[(seed >> 33) as usize % ids.len()];
        let dir = dirs[(seed >> 17) as usize % dirs.len()];
        let force = (seed >> 7) % 3 == 0;
        match store.add(&host, id, Some(dir), force) {
            Ok(_) => {}
            Err(e) => assert_eq!(e.severity(), Severity::Reported, "{e}"),
        }
        if store.is_initialized() {
            assert_unique_paths(&store);
        }
    }
}

#[test]
fn forced_add_rekeys_an_existing_path() {
    let host = host();
    let mut store = LocationStore::new();
    store.add(&host, "a", Some("/srv/proj1"), false).unwrap();
    store.add(&host, "z", Some("/c"), false).unwrap();

    let added = store.add(&host, "b", Some("/srv/proj1"), true).unwrap();
    assert_eq!(added.replaced.as_deref(), Some("a"));
    assert_eq!(store.get("a"), None);
    assert_eq!(store.get("b"), Some("/srv/proj1"));
    assert_eq!(store.get("z"), Some("/c"));
}

#[test]
fn unforced_collisions_are_reported_without_mutation() {
    let host = host();
    let mut store = LocationStore::new();
    store.add(&host, "a", Some("/a"), false).unwrap();
    let snapshot = store.clone();

    let err = store.add(&host, "a", Some("/b"), false).unwrap_err();
    assert!(matches!(err, LocstackError::IdExists { .. }));
    let err = store.add(&host, "other", Some("/a"), false).unwrap_err();
    match err {
        LocstackError::PathExists { id, .. } => assert_eq!(id, "a"),
        e => panic!("unexpected {e:?}"),
    }
    assert_eq!(store, snapshot);
}

#[test]
fn add_resolves_relative_paths() {
    let host = MemoryHost::new("/srv", ["/srv/proj1"]);
    let mut store = LocationStore::new();
    let added = store.add(&host, "p", Some("proj1/"), false).unwrap();
    assert_eq!(added.location.path, "/srv/proj1");

    let err = store.add(&host, "q", Some("nope"), false).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn switch_toggles_between_two_directories() {
    let mut host = MemoryHost::new("/l1", ["/l0"]);
    let mut store = LocationStore::seeded("/l0");

    let first = store.switch(&mut host, None, None).unwrap();
    assert_eq!(first.to, "/l0");
    assert_eq!(host.cwd(), "/l0");
    assert_eq!(store.get(LAST), Some("/l1"));

    let second = store.switch(&mut host, None, None).unwrap();
    assert_eq!(second.to, "/l1");
    assert_eq!(host.cwd(), "/l1");
    assert_eq!(store.get(LAST), Some("/l0"));
}

#[test]
fn switch_by_id_and_by_path_record_last() {
    let mut host = host();
    let mut store = LocationStore::new();
    store.add(&host, "p1", Some("/srv/proj1"), false).unwrap();

    store.switch(&mut host, Some("p1"), None).unwrap();
    assert_eq!(host.cwd(), "/srv/proj1");
    assert_eq!(store.get(LAST), Some("/home/me"));

    store.switch(&mut host, None, Some("../proj2")).unwrap();
    assert_eq!(host.cwd(), "/srv/proj2");
    assert_eq!(store.get(LAST), Some("/srv/proj1"));

    let err = store.switch(&mut host, Some("bad-id"), None).unwrap_err();
    assert!(matches!(err, LocstackError::InvalidIdentifier(_)));
}

#[test]
fn wildcard_id_filter_selects_matching_ids() {
    let store = LocationStore::from_entries(Entries::from([
        (s("proj1"), s("/a")),
        (s("proj2"), s("/b")),
        (s("home"), s("/c")),
    ]));
    let selection = store.show(&[s("proj*")], &[]).unwrap();
    assert_eq!(
        selection.entries,
        Entries::from([(s("proj1"), s("/a")), (s("proj2"), s("/b"))])
    );
    assert!(selection.rejected.is_empty());
}

#[test]
fn id_and_path_matches_are_unioned() {
    let store = LocationStore::from_entries(Entries::from([
        (s("proj1"), s("/srv/proj1")),
        (s("home"), s("/home/me")),
        (s("tmp"), s("/tmp")),
    ]));
    let selection = store.show(&[s("proj*")], &[s("/home/*"), s("/srv/*")]).unwrap();
    assert_eq!(selection.entries.len(), 2);
    assert!(selection.entries.contains_key("proj1"));
    assert!(selection.entries.contains_key("home"));
}

#[test]
fn invalid_patterns_are_reported_but_valid_ones_apply() {
    let store = LocationStore::from_entries(Entries::from([
        (s("proj1"), s("/a")),
        (s("home"), s("/c")),
    ]));
    let selection = store.show(&[s("pro-j"), s("ho*")], &[]).unwrap();
    assert_eq!(selection.rejected, vec![s("pro-j")]);
    assert_eq!(selection.entries, Entries::from([(s("home"), s("/c"))]));
}

#[test]
fn show_returns_an_independent_copy() {
    let store = LocationStore::from_entries(Entries::from([(s("a"), s("/a"))]));
    let mut selection = store.show(&[], &[]).unwrap();
    selection.entries.insert(s("b"), s("/b"));
    assert_eq!(store.len(), 1);
}

#[test]
fn queries_on_empty_store_are_reported() {
    let mut host = host();
    for mut store in [LocationStore::new(), LocationStore::from_entries(Entries::new())] {
        assert!(matches!(store.show(&[], &[]), Err(LocstackError::EmptyStore)));
        assert!(matches!(
            store.open(&mut host, &[], &[]),
            Err(LocstackError::EmptyStore)
        ));
        assert!(matches!(store.remove("a", true), Err(LocstackError::EmptyStore)));
    }
}

#[test]
fn remove_previews_until_forced() {
    let host = host();
    let mut store = LocationStore::new();
    store.add(&host, "a", Some("/a"), false).unwrap();

    match store.remove("a", false).unwrap() {
        Removal::Preview(loc) => assert_eq!(loc.path, "/a"),
        other => panic!("expected preview, got {other:?}"),
    }
    assert_eq!(store.get("a"), Some("/a"));

    assert!(matches!(store.remove("a", true).unwrap(), Removal::Removed(_)));
    assert_eq!(store.get("a"), None);
    assert!(matches!(store.remove("a", true), Err(LocstackError::EmptyStore)));
}

#[test]
fn remove_unknown_id_is_reported() {
    let store_entries = Entries::from([(s("a"), s("/a"))]);
    let mut store = LocationStore::from_entries(store_entries);
    let err = store.remove("b", true).unwrap_err();
    assert!(matches!(err, LocstackError::NotFound(_)));
    assert!(!err.is_fatal());
}

#[test]
fn clear_keeps_last_unless_forced() {
    let mut store = LocationStore::from_entries(Entries::from([
        (s(LAST), s("/l")),
        (s("a"), s("/p1")),
        (s("b"), s("/p2")),
    ]));
    assert_eq!(store.clear(false), Cleared::KeptLast { removed: 2 });
    assert_eq!(store.entries(), Some(&Entries::from([(s(LAST), s("/l"))])));

    assert_eq!(store.clear(true), Cleared::Discarded);
    assert!(!store.is_initialized());
    assert!(store.is_empty());
}

#[test]
fn open_dedupes_aliased_paths_and_defaults_to_everything() {
    let mut host = host();
    let store = LocationStore::from_entries(Entries::from([
        (s(LAST), s("/a")),
        (s("a"), s("/a")),
        (s("b"), s("/b")),
    ]));
    let opened = store.open(&mut host, &[], &[]).unwrap();
    assert_eq!(opened.paths, vec![s("/a"), s("/b")]);
    assert_eq!(host.opened, vec![s("/a"), s("/b")]);

    let mut host = self::host();
    let opened = store.open(&mut host, &[s("b")], &[]).unwrap();
    assert_eq!(opened.paths, vec![s("/b")]);
}

#[test]
fn open_filtered_by_paths_only() {
    let mut host = host();
    let store = LocationStore::from_entries(Entries::from([
        (s("p1"), s("/srv/proj1")),
        (s("p2"), s("/srv/proj2")),
        (s("a"), s("/a")),
    ]));
    let opened = store.open(&mut host, &[], &[s("/srv/*")]).unwrap();
    assert_eq!(opened.paths, vec![s("/srv/proj1"), s("/srv/proj2")]);
    assert_eq!(host.opened, opened.paths);
    assert!(opened.rejected.is_empty());
}
