pub mod assets;
pub mod community;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod publish;
pub mod types;
pub mod vote;

pub use assets::{asset_routes, AssetService};
pub use community::{community_routes, CommunityService};
pub use error_code::ErrorCode;
pub use health::{health_routes, AppStartTime, HealthService};
pub use publish::{publish_routes, PublishService};
pub use vote::{vote_routes, VoteService};

use actix_web::web;

/// Public API v1 路由
///
/// 组合所有子模块路由
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .service(vote_routes())
        .service(publish_routes())
        .service(community_routes())
        .service(asset_routes())
}
