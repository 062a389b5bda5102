//! Anonymous community ballot endpoint

use actix_web::{web, Responder, Result as ActixResult};
use std::sync::Arc;
use tracing::trace;

use crate::services::{CommunityBallot, CommunityEngine};

use super::helpers::{api_result, blocking_result};
use super::types::CommunityVoteRequest;

pub struct CommunityService;

impl CommunityService {
    pub async fn submit_vote(
        body: web::Json<CommunityVoteRequest>,
        engine: web::Data<Arc<CommunityEngine>>,
    ) -> ActixResult<impl Responder> {
        let body = body.into_inner();
        trace!("community vote for {}", body.concept_label);

        let ballot = CommunityBallot {
            voter_name: body.voter_name,
            concept_id: body.concept_id,
            concept_label: body.concept_label,
            site_url: body.site_url,
        };

        let engine = engine.get_ref().clone();
        let result = web::block(move || engine.submit(ballot)).await;

        Ok(api_result(blocking_result(result).map(|_| ())))
    }
}

/// 社区投票路由 `/community`
pub fn community_routes() -> actix_web::Scope {
    web::scope("/community").route("/ballot", web::post().to(CommunityService::submit_vote))
}
