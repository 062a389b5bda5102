//! Publish/republish endpoint

use actix_web::{web, Responder, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::services::{PublishEngine, PublishRequest};

use super::helpers::{api_result, blocking_result};
use super::types::{PublishBody, PublishResponse};

/// UI 默认按钮/在线状态颜色
const DEFAULT_BUTTON_COLOR: &str = "#0066FF";
const DEFAULT_PRESENCE_COLOR: &str = "#22c55e";

pub struct PublishService;

impl PublishService {
    pub async fn publish(
        body: web::Json<PublishBody>,
        engine: web::Data<Arc<PublishEngine>>,
    ) -> ActixResult<impl Responder> {
        let body = body.into_inner();
        info!("publish requested for {}", body.site_url);

        let request = PublishRequest {
            site_url: body.site_url,
            client_name: body.client_name,
            lang: body.lang.unwrap_or_default(),
            button_color: body
                .button_color
                .unwrap_or_else(|| DEFAULT_BUTTON_COLOR.to_string()),
            presence_color: body
                .presence_color
                .unwrap_or_else(|| DEFAULT_PRESENCE_COLOR.to_string()),
            screenshot: body.screenshot,
        };

        let engine = engine.get_ref().clone();
        let result = web::block(move || engine.publish(request)).await;

        Ok(api_result(
            blocking_result(result).map(PublishResponse::from),
        ))
    }
}

/// 发布路由 `/publish`
pub fn publish_routes() -> actix_web::Scope {
    web::scope("/publish").route("", web::post().to(PublishService::publish))
}
