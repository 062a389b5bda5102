use std::sync::Arc;

use votelinker::config::AppConfig;
use votelinker::labels::Lang;
use votelinker::services::{
    AggregateTable, BallotEngine, BallotRequest, PublishEngine, PublishRequest, VoteEntry,
    VoteReader,
};
use votelinker::store::{
    BlockContent, CreatePage, MemoryRecordStore, Parent, Properties, PropertyValue, RecordStore,
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

fn test_config(root_id: &str) -> Arc<AppConfig> {
    let mut config = AppConfig::default();
    config.store.workspace_root_id = root_id.to_string();
    config.links.public_base_url = "https://vote.test".into();
    Arc::new(config)
}

fn publish_request(site_url: &str, client_name: Option<&str>) -> PublishRequest {
    PublishRequest {
        site_url: site_url.into(),
        client_name: client_name.map(String::from),
        lang: Lang::Fr,
        button_color: "#0066FF".into(),
        presence_color: "#22c55e".into(),
        screenshot: "https://shots.example/site.png".into(),
    }
}

fn count_child_pages(store: &MemoryRecordStore, root_id: &str) -> usize {
    store
        .list_children(root_id, None, 200)
        .unwrap()
        .results
        .iter()
        .filter(|b| matches!(b.content, BlockContent::ChildPage { .. }))
        .count()
}

#[test]
fn test_first_publish_creates_everything() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let config = test_config(&root);
    let engine = PublishEngine::new(store.clone(), config.clone());

    let result = engine
        .publish(publish_request("https://www.example.com", None))
        .unwrap();

    assert!(!result.was_update);
    // Name derived from hostname: www stripped, first label capitalized
    assert_eq!(result.vote_url, "https://vote.test/vote/example");

    let reader = VoteReader::new(store.clone(), config.clone());
    let view = reader.read("example").unwrap();
    assert_eq!(view.client_name, "Example");
    assert_eq!(view.lang, Lang::Fr);
    assert_eq!(view.designs.len(), 4);
    assert!(!view.has_voted);
    assert!(view.result_row_id.is_some());
    assert_eq!(view.button_color.as_deref(), Some("#0066FF"));

    // Fixed canonical variant order with the stable option letters
    assert_eq!(view.designs[0].title, "Option B - Classique");
    assert_eq!(view.designs[1].title, "Option B2 - Présence Intégrée ⭐");
    assert_eq!(view.designs[2].title, "Option D - Symétrie Verticale");
    assert_eq!(view.designs[3].title, "Option D2 - Symétrie + Glow ⭐");
    assert!(view.designs[1].recommended);
    assert!(!view.designs[0].recommended);

    // Shared screenshot referenced by every row
    for design in &view.designs {
        assert_eq!(design.image_url, "https://shots.example/site.png");
    }
}

#[test]
fn test_publish_is_idempotent_on_normalized_name() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let config = test_config(&root);
    let engine = PublishEngine::new(store.clone(), config.clone());

    let first = engine
        .publish(publish_request("https://www.acme.fr", Some("Acme")))
        .unwrap();
    let second = engine
        .publish(publish_request("https://www.acme.fr", Some("Acme")))
        .unwrap();

    assert!(!first.was_update);
    assert!(second.was_update);
    assert_eq!(first.client_page_id, second.client_page_id);
    assert_eq!(first.result_row_id, second.result_row_id);
    // The public link survives the republish
    assert_eq!(first.vote_url, second.vote_url);

    // One client page, one results table
    assert_eq!(count_child_pages(&store, &root), 1);
    let aggregate = AggregateTable::new(store.clone(), &root);
    let table_id = aggregate.find().unwrap().unwrap();
    let rows = store.query_rows(&table_id, None, 100).unwrap();
    assert_eq!(rows.results.len(), 1);
}

#[test]
fn test_republish_preserves_design_row_identity() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let config = test_config(&root);
    let engine = PublishEngine::new(store.clone(), config.clone());
    let reader = VoteReader::new(store.clone(), config.clone());

    engine
        .publish(publish_request("https://www.acme.fr", Some("Acme")))
        .unwrap();
    let before: Vec<String> = reader
        .read("acme")
        .unwrap()
        .designs
        .iter()
        .map(|d| d.page_id.clone())
        .collect();

    engine
        .publish(publish_request("https://www.acme.fr", Some("Acme")))
        .unwrap();
    let after: Vec<String> = reader
        .read("acme")
        .unwrap()
        .designs
        .iter()
        .map(|d| d.page_id.clone())
        .collect();

    assert_eq!(before, after);
}

#[test]
fn test_republish_archives_prior_votes_and_clears_ranks() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let config = test_config(&root);
    let engine = PublishEngine::new(store.clone(), config.clone());
    let reader = VoteReader::new(store.clone(), config.clone());
    let ballots = BallotEngine::new(store.clone());

    engine
        .publish(publish_request("https://www.acme.fr", Some("Acme")))
        .unwrap();
    let view = reader.read("acme").unwrap();

    ballots
        .submit(BallotRequest {
            votes: vec![
                VoteEntry {
                    page_id: view.designs[0].page_id.clone(),
                    ranking: "1er choix".into(),
                },
                VoteEntry {
                    page_id: view.designs[1].page_id.clone(),
                    ranking: "2e choix".into(),
                },
                VoteEntry {
                    page_id: view.designs[2].page_id.clone(),
                    ranking: "3e choix".into(),
                },
            ],
            comment: Some("Love the glow".into()),
            lang: view.lang,
            result_row_id: view.result_row_id.clone(),
        })
        .unwrap();
    assert!(reader.read("acme").unwrap().has_voted);

    let result = engine
        .publish(publish_request("https://www.acme.fr", Some("Acme")))
        .unwrap();
    assert!(result.was_update);

    // Ranks are gone immediately after the republish
    let view = reader.read("acme").unwrap();
    assert!(!view.has_voted);
    for design in &view.designs {
        assert!(design.ranking.is_none());
        assert!(design.comment.is_empty());
    }

    // The prior ranking survives as a dated archive line in the comment
    let row = store.retrieve_page(&result.result_row_id).unwrap();
    let comment = row
        .property("Commentaire")
        .and_then(|p| p.as_plain_text())
        .unwrap();
    assert!(comment.starts_with("[Archive "));
    assert!(comment.contains("Option B - Classique"));
    assert!(comment.contains("Option B2 - Présence Intégrée ⭐"));
    assert!(comment.contains("\nLove the glow"));

    for col in ["1er choix", "2e choix", "3e choix"] {
        let text = row.property(col).and_then(|p| p.as_plain_text()).unwrap();
        assert!(text.is_empty(), "{col} should be cleared");
    }
    let date = row.property("Date").unwrap();
    assert_eq!(date, &PropertyValue::date_none());
}

#[test]
fn test_embedded_screenshot_uploaded_once() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let config = test_config(&root);
    let engine = PublishEngine::new(store.clone(), config.clone());

    let mut request = publish_request("https://www.acme.fr", Some("Acme"));
    request.screenshot = "data:image/png;base64,aGVsbG8=".into();
    engine.publish(request).unwrap();

    // Four design rows, one binary
    assert_eq!(store.upload_count(), 1);

    let reader = VoteReader::new(store.clone(), config);
    let view = reader.read("acme").unwrap();
    for design in &view.designs {
        assert!(design.image_url.starts_with("memstore://files/"));
    }
}

#[test]
fn test_invalid_site_url_rejected() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let engine = PublishEngine::new(store.clone(), test_config(&root));

    let err = engine
        .publish(publish_request("ftp://acme.fr", Some("Acme")))
        .unwrap_err();
    assert!(matches!(
        err,
        votelinker::errors::VotelinkerError::Validation(_)
    ));

    // Nothing was created
    assert_eq!(count_child_pages(&store, &root), 0);
}
