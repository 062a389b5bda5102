//! Health endpoints

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, trace};

use crate::api::services::error_code::ErrorCode;
use crate::api::services::types::{ApiResponse, HealthChecks, HealthResponse, HealthStoreCheck};
use crate::config::AppConfig;
use crate::store::RecordStore;

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// Health Service
///
/// The store check is a single one-block listing of the workspace root:
/// cheap, and it exercises auth, connectivity and the root id in one call.
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        store: web::Data<Arc<dyn RecordStore>>,
        config: web::Data<Arc<AppConfig>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let store = store.get_ref().clone();
        let root_id = config.store.workspace_root_id.clone();

        let probe = web::block(move || store.list_children(&root_id, None, 1));
        let store_status = match tokio::time::timeout(Duration::from_secs(5), probe).await {
            Ok(Ok(Ok(_))) => {
                trace!("Store health check passed");
                HealthStoreCheck {
                    status: "healthy".to_string(),
                    error: None,
                }
            }
            Ok(Ok(Err(e))) => {
                error!("Store health check failed: {}", e);
                HealthStoreCheck {
                    status: "unhealthy".to_string(),
                    error: Some(format!("store error: {}", e)),
                }
            }
            Ok(Err(e)) => {
                error!("Store health check blocking task failed: {}", e);
                HealthStoreCheck {
                    status: "unhealthy".to_string(),
                    error: Some(format!("blocking task failed: {}", e)),
                }
            }
            Err(_) => {
                error!("Store health check timeout");
                HealthStoreCheck {
                    status: "unhealthy".to_string(),
                    error: Some("timeout".to_string()),
                }
            }
        };

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u32;
        let is_healthy = store_status.status == "healthy";

        let health_data = HealthResponse {
            status: if is_healthy {
                "healthy".to_string()
            } else {
                "unhealthy".to_string()
            },
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds,
            checks: HealthChecks {
                store: store_status,
            },
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        let health_response = ApiResponse {
            code: if is_healthy {
                ErrorCode::Success as i32
            } else {
                ErrorCode::ServiceUnavailable as i32
            },
            message: if is_healthy {
                "OK".to_string()
            } else {
                "Service Unavailable".to_string()
            },
            data: Some(health_data),
        };

        let response_status = if is_healthy {
            actix_web::http::StatusCode::OK
        } else {
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        };

        info!(
            "Health check completed in {:?}, status: {}",
            start_time.elapsed(),
            if is_healthy { "healthy" } else { "unhealthy" },
        );

        HttpResponse::build(response_status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(health_response)
    }

    // 简单的就绪检查，只返回 200 状态码
    pub async fn readiness_check() -> impl Responder {
        trace!("Received readiness check request");

        HttpResponse::Ok()
            .append_header(("Content-Type", "text/plain"))
            .body("OK")
    }

    // 活跃性检查，检查基本服务可用性
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");

        HttpResponse::NoContent().finish()
    }
}

/// Health 路由配置
pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
