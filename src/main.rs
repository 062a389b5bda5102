use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use tracing::info;

use votelinker::api::{api_routes, health_routes, AppStartTime};
use votelinker::config::AppConfig;
use votelinker::services::{
    BallotEngine, ChatNotifier, CommunityEngine, ExampleService, FaviconService, PublishEngine,
    ScreenshotService, VoteReader,
};
use votelinker::store::{HttpRecordStore, RecordStore};
use votelinker::system::logging::init_logging;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 记录程序启动时间
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    dotenv().ok();

    let config = Arc::new(AppConfig::load());

    // Guard 必须存活到进程结束，否则日志丢失
    let _log_guard = init_logging(&config.logging);

    if let Err(e) = config.validate_store() {
        // 启动即失败：缺少凭据的部署不应该悄悄跑起来
        eprintln!("{}", e.format_simple());
        return Err(std::io::Error::other(e.to_string()));
    }

    let store: Arc<dyn RecordStore> = Arc::new(HttpRecordStore::new(
        &config.store.base_url,
        &config.store.token,
    ));

    let vote_reader = Arc::new(VoteReader::new(store.clone(), config.clone()));
    let ballot_engine = Arc::new(BallotEngine::new(store.clone()));
    let publish_engine = Arc::new(PublishEngine::new(store.clone(), config.clone()));
    let notifier = Arc::new(ChatNotifier::new(config.notifier.clone()));
    let community_engine = Arc::new(CommunityEngine::new(
        store.clone(),
        notifier.clone(),
        config.clone(),
    ));
    let screenshot_service = Arc::new(ScreenshotService::with_default_providers());
    let favicon_service = Arc::new(FaviconService::new());
    let example_service = Arc::new(ExampleService::new());

    if notifier.enabled() {
        info!("Chat notifier enabled");
    } else {
        info!("Chat notifier disabled (NOTIFY_BOT_TOKEN / NOTIFY_CHANNEL_ID not set)");
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    let config_data = config.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::Data::new(vote_reader.clone()))
            .app_data(web::Data::new(ballot_engine.clone()))
            .app_data(web::Data::new(publish_engine.clone()))
            .app_data(web::Data::new(community_engine.clone()))
            .app_data(web::Data::new(screenshot_service.clone()))
            .app_data(web::Data::new(favicon_service.clone()))
            .app_data(web::Data::new(example_service.clone()))
            .wrap(Cors::permissive())
            .service(api_routes())
            .service(web::scope("/health").service(health_routes()))
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
