//! Vote read and ballot submission endpoints

use actix_web::{web, Responder, Result as ActixResult};
use std::sync::Arc;
use tracing::trace;

use crate::services::{BallotEngine, BallotRequest, VoteEntry, VoteReader};

use super::helpers::{api_result, blocking_result};
use super::types::{BallotSubmitRequest, BallotSubmitResponse, VoteDataResponse};

pub struct VoteService;

impl VoteService {
    /// 读取投票页数据（slug 或 record id）
    pub async fn get_vote_data(
        path: web::Path<String>,
        reader: web::Data<Arc<VoteReader>>,
    ) -> ActixResult<impl Responder> {
        let identifier = path.into_inner();
        trace!("vote data requested for {:?}", identifier);

        let reader = reader.get_ref().clone();
        let result = web::block(move || reader.read(&identifier)).await;

        Ok(api_result(
            blocking_result(result).map(VoteDataResponse::from),
        ))
    }

    /// 提交排序投票
    pub async fn submit_ballot(
        _path: web::Path<String>,
        body: web::Json<BallotSubmitRequest>,
        engine: web::Data<Arc<BallotEngine>>,
    ) -> ActixResult<impl Responder> {
        let body = body.into_inner();
        trace!("ballot submitted with {} votes", body.votes.len());

        let request = BallotRequest {
            votes: body
                .votes
                .into_iter()
                .map(|v| VoteEntry {
                    page_id: v.page_id,
                    ranking: v.ranking,
                })
                .collect(),
            comment: body.comment,
            lang: body.lang.unwrap_or_default(),
            result_row_id: body.result_row_id,
        };

        let engine = engine.get_ref().clone();
        let result = web::block(move || engine.submit(request)).await;

        Ok(api_result(
            blocking_result(result).map(BallotSubmitResponse::from),
        ))
    }
}

/// 投票路由 `/vote`
pub fn vote_routes() -> actix_web::Scope {
    web::scope("/vote")
        .route("/{identifier}", web::get().to(VoteService::get_vote_data))
        .route(
            "/{identifier}/ballot",
            web::post().to(VoteService::submit_ballot),
        )
}
