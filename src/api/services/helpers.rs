//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

use crate::errors::VotelinkerError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 VotelinkerError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_votelinker(err: &VotelinkerError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err);
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 VotelinkerError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<VotelinkerError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: VotelinkerError = e.into();
            error_from_votelinker(&err)
        }
    }
}

/// `web::block` 调用结果的统一展开：阻塞池故障视为 500。
pub fn blocking_result<T>(
    result: Result<crate::errors::Result<T>, actix_web::error::BlockingError>,
) -> crate::errors::Result<T> {
    match result {
        Ok(inner) => inner,
        Err(e) => Err(VotelinkerError::store_operation(format!(
            "blocking task failed: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = success_response("data");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::BadRequest,
            "Something went wrong",
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_from_votelinker_maps_not_found() {
        let err = VotelinkerError::not_found("client not found: x");
        let response = error_from_votelinker(&err);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_from_votelinker_maps_validation() {
        let err = VotelinkerError::validation("each rank may be used once");
        let response = error_from_votelinker(&err);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_from_votelinker_hides_config_detail() {
        let err = VotelinkerError::config("STORE_API_TOKEN not configured");
        let response = error_from_votelinker(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
