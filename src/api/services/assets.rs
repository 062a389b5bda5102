//! Screenshot, favicon and example endpoints

use actix_web::{web, HttpResponse, Responder, Result as ActixResult};
use std::sync::Arc;
use tracing::trace;

use crate::api::constants::{EXAMPLE_CACHE_CONTROL, FAVICON_CACHE_CONTROL};
use crate::services::{ExampleService, FaviconService, ScreenshotService};

use super::error_code::ErrorCode;
use super::helpers::{blocking_result, error_from_votelinker, json_response};
use super::types::{ExampleResponse, FaviconQuery, ScreenshotRequest, ScreenshotResponse};

const DEFAULT_FAVICON_SIZE: u32 = 64;

pub struct AssetService;

impl AssetService {
    /// 站点截图（提供者链）
    ///
    /// 提供者全部失败不算错误：响应仍带 favicon 和手动上传提示。
    pub async fn capture_screenshot(
        body: web::Json<ScreenshotRequest>,
        service: web::Data<Arc<ScreenshotService>>,
    ) -> ActixResult<impl Responder> {
        let url = body.into_inner().url;
        trace!("screenshot requested for {url}");

        let service = service.get_ref().clone();
        let result = web::block(move || service.capture(&url)).await;

        Ok(match blocking_result(result) {
            Ok(outcome) => json_response(
                actix_web::http::StatusCode::OK,
                ErrorCode::Success,
                "OK",
                Some(ScreenshotResponse::from(outcome)),
            ),
            Err(e) => error_from_votelinker(&e),
        })
    }

    /// Favicon 代理：带 CORS 和 24 小时缓存
    pub async fn proxy_favicon(
        query: web::Query<FaviconQuery>,
        service: web::Data<Arc<FaviconService>>,
    ) -> ActixResult<impl Responder> {
        let query = query.into_inner();
        let size = query.size.unwrap_or(DEFAULT_FAVICON_SIZE);

        let service = service.get_ref().clone();
        let result = web::block(move || service.fetch(&query.domain, size)).await;

        Ok(match blocking_result(result) {
            Ok(image) => HttpResponse::Ok()
                .append_header(("Content-Type", image.content_type))
                .append_header(("Cache-Control", FAVICON_CACHE_CONTROL))
                .append_header(("Access-Control-Allow-Origin", "*"))
                .body(image.bytes),
            Err(e) => error_from_votelinker(&e),
        })
    }

    /// 示例预览（进程内缓存）
    pub async fn get_example(
        service: web::Data<Arc<ExampleService>>,
    ) -> ActixResult<impl Responder> {
        let service = service.get_ref().clone();
        let result = web::block(move || service.get()).await;

        Ok(match result {
            Ok(view) => HttpResponse::Ok()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .append_header(("Cache-Control", EXAMPLE_CACHE_CONTROL))
                .json(super::types::ApiResponse {
                    code: ErrorCode::Success as i32,
                    message: "OK".to_string(),
                    data: Some(ExampleResponse::from(view)),
                }),
            Err(e) => json_response::<()>(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                &format!("blocking task failed: {e}"),
                None,
            ),
        })
    }
}

/// 外部资源路由
pub fn asset_routes() -> actix_web::Scope {
    web::scope("")
        .route(
            "/screenshot",
            web::post().to(AssetService::capture_screenshot),
        )
        .route("/favicon", web::get().to(AssetService::proxy_favicon))
        .route("/example", web::get().to(AssetService::get_example))
}
