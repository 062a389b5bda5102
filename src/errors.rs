use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum VotelinkerError {
    Config(String),
    Validation(String),
    NotFound(String),
    StoreConnection(String),
    StoreOperation(String),
    Serialization(String),
    UpstreamUnavailable(String),
    NotifyServer(String),
}

impl VotelinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            VotelinkerError::Config(_) => "E001",
            VotelinkerError::Validation(_) => "E002",
            VotelinkerError::NotFound(_) => "E003",
            VotelinkerError::StoreConnection(_) => "E004",
            VotelinkerError::StoreOperation(_) => "E005",
            VotelinkerError::Serialization(_) => "E006",
            VotelinkerError::UpstreamUnavailable(_) => "E007",
            VotelinkerError::NotifyServer(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            VotelinkerError::Config(_) => "Configuration Error",
            VotelinkerError::Validation(_) => "Validation Error",
            VotelinkerError::NotFound(_) => "Resource Not Found",
            VotelinkerError::StoreConnection(_) => "Record Store Connection Error",
            VotelinkerError::StoreOperation(_) => "Record Store Operation Error",
            VotelinkerError::Serialization(_) => "Serialization Error",
            VotelinkerError::UpstreamUnavailable(_) => "Upstream Provider Unavailable",
            VotelinkerError::NotifyServer(_) => "Notify Server Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            VotelinkerError::Config(msg) => msg,
            VotelinkerError::Validation(msg) => msg,
            VotelinkerError::NotFound(msg) => msg,
            VotelinkerError::StoreConnection(msg) => msg,
            VotelinkerError::StoreOperation(msg) => msg,
            VotelinkerError::Serialization(msg) => msg,
            VotelinkerError::UpstreamUnavailable(msg) => msg,
            VotelinkerError::NotifyServer(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    ///
    /// Config errors map to a generic 500 so secrets never leak through the
    /// public surface; store errors keep the underlying message.
    pub fn http_status(&self) -> StatusCode {
        match self {
            VotelinkerError::Validation(_) => StatusCode::BAD_REQUEST,
            VotelinkerError::NotFound(_) => StatusCode::NOT_FOUND,
            VotelinkerError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for VotelinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for VotelinkerError {}

// 便捷的构造函数
impl VotelinkerError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        VotelinkerError::Config(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        VotelinkerError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        VotelinkerError::NotFound(msg.into())
    }

    pub fn store_connection<T: Into<String>>(msg: T) -> Self {
        VotelinkerError::StoreConnection(msg.into())
    }

    pub fn store_operation<T: Into<String>>(msg: T) -> Self {
        VotelinkerError::StoreOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        VotelinkerError::Serialization(msg.into())
    }

    pub fn upstream_unavailable<T: Into<String>>(msg: T) -> Self {
        VotelinkerError::UpstreamUnavailable(msg.into())
    }

    pub fn notify_server<T: Into<String>>(msg: T) -> Self {
        VotelinkerError::NotifyServer(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for VotelinkerError {
    fn from(err: std::io::Error) -> Self {
        VotelinkerError::StoreConnection(err.to_string())
    }
}

impl From<serde_json::Error> for VotelinkerError {
    fn from(err: serde_json::Error) -> Self {
        VotelinkerError::Serialization(err.to_string())
    }
}

impl From<ureq::Error> for VotelinkerError {
    fn from(err: ureq::Error) -> Self {
        VotelinkerError::StoreOperation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VotelinkerError>;
