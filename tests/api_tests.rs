use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::json;

use votelinker::api::api_routes;
use votelinker::config::AppConfig;
use votelinker::labels::Lang;
use votelinker::services::{BallotEngine, PublishEngine, PublishRequest, VoteReader};
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

fn config_for(root: &str) -> Arc<AppConfig> {
    let mut config = AppConfig::default();
    config.store.workspace_root_id = root.to_string();
    config.links.public_base_url = "https://vote.test".into();
    Arc::new(config)
}

macro_rules! init_app {
    ($store:expr, $config:expr) => {{
        let generic: Arc<dyn RecordStore> = $store.clone();
        test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new(VoteReader::new(
                    generic.clone(),
                    $config.clone(),
                ))))
                .app_data(web::Data::new(Arc::new(BallotEngine::new(generic.clone()))))
                .app_data(web::Data::new(Arc::new(PublishEngine::new(
                    generic.clone(),
                    $config.clone(),
                ))))
                .service(api_routes()),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_publish_then_read_vote_data() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let config = config_for(&root);
    let app = init_app!(store, config);

    let publish = test::TestRequest::post()
        .uri("/api/publish")
        .set_json(json!({
            "site_url": "https://www.example.com",
            "screenshot": "https://shots.example/site.png",
        }))
        .to_request();
    let response = test::call_service(&app, publish).await;
    assert!(response.status().is_success());

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["vote_url"], "https://vote.test/vote/example");
    assert_eq!(body["data"]["was_update"], false);

    let read = test::TestRequest::get()
        .uri("/api/vote/example")
        .to_request();
    let response = test::call_service(&app, read).await;
    assert!(response.status().is_success());

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["client_name"], "Example");
    assert_eq!(body["data"]["has_voted"], false);
    assert_eq!(body["data"]["designs"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_unknown_slug_returns_404() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let config = config_for(&root);
    let app = init_app!(store, config);

    let request = test::TestRequest::get()
        .uri("/api/vote/nobody-here")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_duplicate_rank_ballot_returns_400() {
    let store = Arc::new(MemoryRecordStore::new());
    let root = make_root(&store);
    let config = config_for(&root);

    let generic: Arc<dyn RecordStore> = store.clone();
    PublishEngine::new(generic.clone(), config.clone())
        .publish(PublishRequest {
            site_url: "https://www.acme.fr".into(),
            client_name: Some("Acme".into()),
            lang: Lang::Fr,
            button_color: "#0066FF".into(),
            presence_color: "#22c55e".into(),
            screenshot: "https://shots.example/site.png".into(),
        })
        .unwrap();

    let view = VoteReader::new(generic, config.clone())
        .read("acme")
        .unwrap();

    let app = init_app!(store, config);
    let request = test::TestRequest::post()
        .uri("/api/vote/acme/ballot")
        .set_json(json!({
            "votes": [
                { "page_id": view.designs[0].page_id, "ranking": "1er choix" },
                { "page_id": view.designs[1].page_id, "ranking": "1er choix" },
            ],
            "lang": "fr",
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "each rank may be used once");
}
