//! API 模块常量定义

/// TypeScript 类型导出目录
pub const TS_EXPORT_PATH: &str = "vote-panel/src/services/types.generated.ts";

/// Favicon 代理响应缓存时长（24 小时）
pub const FAVICON_CACHE_CONTROL: &str = "public, max-age=86400";

/// Example 响应缓存时长
pub const EXAMPLE_CACHE_CONTROL: &str = "public, max-age=3600, s-maxage=86400";
