//! API 类型定义

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::labels::{LabelSet, Lang};
use crate::services::vote_reader::{VoteDesign, VoteView};
use crate::services::{BallotResult, ExampleView, PublishResult, ScreenshotOutcome};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

// ============ Vote data ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DesignResponse {
    pub page_id: String,
    pub title: String,
    pub description: String,
    pub recommended: bool,
    pub image_url: String,
    pub ranking: Option<String>,
    pub comment: String,
}

impl From<VoteDesign> for DesignResponse {
    fn from(design: VoteDesign) -> Self {
        Self {
            page_id: design.page_id,
            title: design.title,
            description: design.description,
            recommended: design.recommended,
            image_url: design.image_url,
            ranking: design.ranking,
            comment: design.comment,
        }
    }
}

// Response-only: `LabelSet` holds static label tables and has no
// deserializer.
#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct VoteDataResponse {
    pub client_name: String,
    pub database_id: String,
    pub lang: Lang,
    pub labels: LabelSet,
    pub designs: Vec<DesignResponse>,
    pub has_voted: bool,
    pub result_row_id: Option<String>,
    pub button_color: Option<String>,
    pub presence_color: Option<String>,
}

impl From<VoteView> for VoteDataResponse {
    fn from(view: VoteView) -> Self {
        Self {
            client_name: view.client_name,
            database_id: view.database_id,
            lang: view.lang,
            labels: view.labels,
            designs: view.designs.into_iter().map(DesignResponse::from).collect(),
            has_voted: view.has_voted,
            result_row_id: view.result_row_id,
            button_color: view.button_color,
            presence_color: view.presence_color,
        }
    }
}

// ============ Ballot submission ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct BallotVote {
    pub page_id: String,
    pub ranking: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct BallotSubmitRequest {
    pub votes: Vec<BallotVote>,
    pub comment: Option<String>,
    /// Stored language of the design table, from the vote data response.
    pub lang: Option<Lang>,
    pub result_row_id: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct BallotSubmitResponse {
    pub designs_updated: usize,
    pub aggregate_updated: bool,
}

impl From<BallotResult> for BallotSubmitResponse {
    fn from(result: BallotResult) -> Self {
        Self {
            designs_updated: result.designs_updated,
            aggregate_updated: result.aggregate_updated,
        }
    }
}

// ============ Publish ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PublishBody {
    pub site_url: String,
    pub client_name: Option<String>,
    pub lang: Option<Lang>,
    pub button_color: Option<String>,
    pub presence_color: Option<String>,
    /// Remote image URL or `data:image/...;base64,` URI.
    pub screenshot: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PublishResponse {
    pub page_id: String,
    pub result_row_id: String,
    pub vote_url: String,
    pub was_update: bool,
}

impl From<PublishResult> for PublishResponse {
    fn from(result: PublishResult) -> Self {
        Self {
            page_id: result.client_page_id,
            result_row_id: result.result_row_id,
            vote_url: result.vote_url,
            was_update: result.was_update,
        }
    }
}

// ============ Community ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CommunityVoteRequest {
    pub voter_name: Option<String>,
    pub concept_id: String,
    pub concept_label: String,
    pub site_url: Option<String>,
}

// ============ Screenshot / example / favicon ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ScreenshotRequest {
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ScreenshotResponse {
    pub screenshot_url: Option<String>,
    pub favicon: String,
    pub source: Option<String>,
    pub is_base64: bool,
    pub warning: Option<String>,
    pub error: Option<String>,
}

impl From<ScreenshotOutcome> for ScreenshotResponse {
    fn from(outcome: ScreenshotOutcome) -> Self {
        Self {
            screenshot_url: outcome.screenshot_url,
            favicon: outcome.favicon,
            source: outcome.source.map(str::to_string),
            is_base64: outcome.is_base64,
            warning: outcome.warning,
            error: outcome.error,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ExampleResponse {
    pub client_name: String,
    pub screenshot_url: String,
    pub button_color: String,
    pub presence_color: String,
}

impl From<ExampleView> for ExampleResponse {
    fn from(view: ExampleView) -> Self {
        Self {
            client_name: view.client_name,
            screenshot_url: view.screenshot_url,
            button_color: view.button_color,
            presence_color: view.presence_color,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FaviconQuery {
    pub domain: String,
    pub size: Option<u32>,
}

// ============ 健康检查相关类型 ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthStoreCheck {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthChecks {
    pub store: HealthStoreCheck,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u32,
    pub checks: HealthChecks,
    pub response_time_ms: u32,
}
