use std::sync::Arc;

use votelinker::config::{AppConfig, NotifierConfig};
use votelinker::services::{AggregateTable, ChatNotifier, CommunityBallot, CommunityEngine};
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

fn engine_for(store: Arc<MemoryRecordStore>, root: &str) -> CommunityEngine {
    let mut config = AppConfig::default();
    config.store.workspace_root_id = root.to_string();
    config.links.public_base_url = "https://vote.test".into();
    // Notifier left unconfigured: submissions must work without it
    let notifier = Arc::new(ChatNotifier::new(NotifierConfig::default()));
    let generic: Arc<dyn RecordStore> = store;
    CommunityEngine::new(generic, notifier, Arc::new(config))
}

#[test]
fn test_community_vote_appends_row() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let engine = engine_for(store.clone(), &root);

    engine
        .submit(CommunityBallot {
            voter_name: Some("Alice".into()),
            concept_id: "B2".into(),
            concept_label: "Option B2 - Présence Intégrée ⭐".into(),
            site_url: Some("https://alice.example".into()),
        })
        .unwrap();

    let aggregate = AggregateTable::new(store.clone(), &root);
    let table_id = aggregate.find().unwrap().expect("results table created");
    let rows = store.query_rows(&table_id, None, 100).unwrap();
    assert_eq!(rows.results.len(), 1);

    let row = &rows.results[0];
    assert_eq!(row.title_text().as_deref(), Some("Alice"));
    assert_eq!(
        row.property("1er choix")
            .and_then(|p| p.as_plain_text())
            .as_deref(),
        Some("Option B2 - Présence Intégrée ⭐")
    );
    assert_eq!(
        row.property("Commentaire")
            .and_then(|p| p.as_plain_text())
            .as_deref(),
        Some("https://alice.example")
    );
    assert_eq!(
        row.property("Lien vote").and_then(|p| p.as_url()),
        Some("https://vote.test/demo")
    );
}

#[test]
fn test_blank_voter_name_defaults_to_anonymous() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let engine = engine_for(store.clone(), &root);

    engine
        .submit(CommunityBallot {
            voter_name: Some("   ".into()),
            concept_id: "D".into(),
            concept_label: "Option D - Symétrie Verticale".into(),
            site_url: None,
        })
        .unwrap();

    let aggregate = AggregateTable::new(store.clone(), &root);
    let table_id = aggregate.find().unwrap().unwrap();
    let rows = store.query_rows(&table_id, None, 100).unwrap();
    assert_eq!(rows.results[0].title_text().as_deref(), Some("Anonyme"));
}

#[test]
fn test_missing_concept_is_a_validation_error() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let engine = engine_for(store.clone(), &root);

    let err = engine
        .submit(CommunityBallot {
            voter_name: None,
            concept_id: String::new(),
            concept_label: String::new(),
            site_url: None,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        votelinker::errors::VotelinkerError::Validation(_)
    ));

    // Nothing was created, not even the results table
    let aggregate = AggregateTable::new(store.clone(), &root);
    assert!(aggregate.find().unwrap().is_none());
}
