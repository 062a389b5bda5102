//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::api::constants::TS_EXPORT_PATH;
use crate::errors::VotelinkerError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 投票/发布错误
/// - 4000-4099: 外部服务错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 投票/发布错误 3000-3099
    BallotInvalid = 3000,
    ClientNotFound = 3001,
    StoreFailed = 3002,

    // 外部服务错误 4000-4099
    UpstreamFailed = 4000,
    NotifyFailed = 4001,
}

impl From<&VotelinkerError> for ErrorCode {
    fn from(err: &VotelinkerError) -> Self {
        match err {
            VotelinkerError::Validation(_) => ErrorCode::BallotInvalid,
            VotelinkerError::NotFound(_) => ErrorCode::ClientNotFound,
            VotelinkerError::StoreConnection(_) | VotelinkerError::StoreOperation(_) => {
                ErrorCode::StoreFailed
            }
            VotelinkerError::UpstreamUnavailable(_) => ErrorCode::UpstreamFailed,
            VotelinkerError::NotifyServer(_) => ErrorCode::NotifyFailed,
            VotelinkerError::Config(_) | VotelinkerError::Serialization(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}
