use std::sync::Arc;

use votelinker::services::{is_record_id, slugify, SlugResolver};
use votelinker::store::{
    CreatePage, MemoryRecordStore, Parent, Properties, PropertyValue, RecordStore,
};

fn make_root(store: &MemoryRecordStore) -> String {
    let mut properties = Properties::new();
    properties.insert("title".into(), PropertyValue::title("Vote Widget"));
    store
        .create_page(CreatePage {
            parent: Parent::PageId {
                page_id: "workspace".into(),
            },
            icon: None,
            properties,
            children: Vec::new(),
        })
        .unwrap()
        .id
}

fn add_client(store: &MemoryRecordStore, root_id: &str, name: &str) -> String {
    let mut properties = Properties::new();
    properties.insert("title".into(), PropertyValue::title(name));
    store
        .create_page(CreatePage {
            parent: Parent::PageId {
                page_id: root_id.into(),
            },
            icon: None,
            properties,
            children: Vec::new(),
        })
        .unwrap()
        .id
}

#[test]
fn test_resolve_accented_title_via_slug() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let page_id = add_client(&store, &root, "Société Général");

    let resolver = SlugResolver::new(store.clone(), &root, 100);
    assert_eq!(resolver.resolve("societe-general").unwrap(), page_id);
}

#[test]
fn test_resolution_insensitive_to_normalization() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let page_id = add_client(&store, &root, "Société Général");

    let resolver = SlugResolver::new(store.clone(), &root, 100);

    // resolve(normalize(I)) == resolve(I) for every spelling of the name
    for identifier in ["Société Général", "societe-general", "SOCIETE   GENERAL"] {
        assert_eq!(resolver.resolve(identifier).unwrap(), page_id);
        assert_eq!(resolver.resolve(&slugify(identifier)).unwrap(), page_id);
    }
}

#[test]
fn test_record_id_passes_through_without_lookup() {
    // Empty store: a lookup would fail, a pass-through succeeds.
    let store = Arc::new(MemoryRecordStore::new());
    let resolver = SlugResolver::new(store.clone(), "missing-root", 100);

    let id = "2ff6c41f-4b3a-81ad-b92d-d0af513a04ac";
    assert!(is_record_id(id));
    assert_eq!(resolver.resolve(id).unwrap(), id);
}

#[test]
fn test_unknown_slug_is_not_found() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    add_client(&store, &root, "Acme");

    let resolver = SlugResolver::new(store.clone(), &root, 100);
    let err = resolver.resolve("globex").unwrap_err();
    assert!(matches!(
        err,
        votelinker::errors::VotelinkerError::NotFound(_)
    ));
}

#[test]
fn test_resolution_scans_past_the_first_page() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    for i in 0..7 {
        add_client(&store, &root, &format!("Client {i}"));
    }
    let target = add_client(&store, &root, "Zebra");

    // Page size of 2 forces several pagination rounds.
    let resolver = SlugResolver::new(store.clone(), &root, 2);
    assert_eq!(resolver.resolve("zebra").unwrap(), target);
}

#[test]
fn test_first_matching_sibling_wins() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let first = add_client(&store, &root, "Acme");
    add_client(&store, &root, "ACME");

    let resolver = SlugResolver::new(store.clone(), &root, 100);
    assert_eq!(resolver.resolve("acme").unwrap(), first);
}
