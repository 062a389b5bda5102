//! Application configuration
//!
//! Environment-backed configuration, loaded once at startup and injected
//! into every component that needs it. The workspace root id is deliberately
//! configuration, not a constant: every store-facing service receives it at
//! construction.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::{Result, VotelinkerError};

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// 外部记录存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the workspace API.
    #[serde(default = "default_store_base_url")]
    pub base_url: String,
    /// Bearer token. Required for every store-backed endpoint.
    #[serde(default)]
    pub token: String,
    /// Root page all client pages and the shared results table live under.
    #[serde(default)]
    pub workspace_root_id: String,
    /// Page size used when scanning the root's children for a slug.
    #[serde(default = "default_scan_page_size")]
    pub scan_page_size: usize,
}

/// 对外链接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    /// Public origin vote links are built on, e.g. `https://vote.example.com`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

/// 聊天通知配置（可选，缺省时通知静默跳过）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default = "default_notify_url")]
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub channel: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_store_base_url() -> String {
    "https://api.workspace.example/v1".to_string()
}

fn default_scan_page_size() -> usize {
    100
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_notify_url() -> String {
    "https://slack.com/api/chat.postMessage".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_enable_rotation() -> bool {
    false
}

fn default_max_backups() -> u32 {
    7
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_store_base_url(),
            token: String::new(),
            workspace_root_id: String::new(),
            scan_page_size: default_scan_page_size(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            url: default_notify_url(),
            token: String::new(),
            channel: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: default_enable_rotation(),
            max_backups: default_max_backups(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            links: LinksConfig::default(),
            notifier: NotifierConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load defaults, then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::default();
        config.override_with_env();
        config
    }

    fn override_with_env(&mut self) {
        if let Ok(host) = env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            } else {
                error!("Invalid SERVER_PORT: {}", port);
            }
        }

        if let Ok(base_url) = env::var("STORE_BASE_URL") {
            self.store.base_url = base_url;
        }
        if let Ok(token) = env::var("STORE_API_TOKEN") {
            self.store.token = token;
        }
        if let Ok(root) = env::var("WORKSPACE_ROOT_ID") {
            self.store.workspace_root_id = root;
        }
        if let Ok(size) = env::var("STORE_SCAN_PAGE_SIZE") {
            if let Ok(size) = size.parse() {
                self.store.scan_page_size = size;
            } else {
                error!("Invalid STORE_SCAN_PAGE_SIZE: {}", size);
            }
        }

        if let Ok(base) = env::var("PUBLIC_BASE_URL") {
            self.links.public_base_url = base.trim_end_matches('/').to_string();
        }

        if let Ok(url) = env::var("NOTIFY_URL") {
            self.notifier.url = url;
        }
        if let Ok(token) = env::var("NOTIFY_BOT_TOKEN") {
            self.notifier.token = token;
        }
        if let Ok(channel) = env::var("NOTIFY_CHANNEL_ID") {
            self.notifier.channel = channel;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(file) = env::var("LOG_FILE") {
            self.logging.file = Some(file);
        }
    }

    /// Required settings for store-backed flows. Checked once at startup so
    /// a misconfigured deployment fails loudly instead of per request.
    pub fn validate_store(&self) -> Result<()> {
        if self.store.token.is_empty() {
            return Err(VotelinkerError::config("STORE_API_TOKEN not configured"));
        }
        if self.store.workspace_root_id.is_empty() {
            return Err(VotelinkerError::config("WORKSPACE_ROOT_ID not configured"));
        }
        Ok(())
    }

    /// Whether chat notifications are configured. Missing settings disable
    /// the notifier instead of failing.
    pub fn notifier_enabled(&self) -> bool {
        !self.notifier.token.is_empty() && !self.notifier.channel.is_empty()
    }

    /// Public vote URL for a slug.
    pub fn vote_url(&self, slug: &str) -> String {
        format!(
            "{}/vote/{}",
            self.links.public_base_url.trim_end_matches('/'),
            slug
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.scan_page_size, 100);
        assert!(!config.notifier_enabled());
    }

    #[test]
    fn test_validate_store_requires_token_and_root() {
        let mut config = AppConfig::default();
        assert!(config.validate_store().is_err());

        config.store.token = "secret".into();
        assert!(config.validate_store().is_err());

        config.store.workspace_root_id = "root".into();
        assert!(config.validate_store().is_ok());
    }

    #[test]
    fn test_vote_url() {
        let mut config = AppConfig::default();
        config.links.public_base_url = "https://vote.example.com/".into();
        assert_eq!(config.vote_url("acme"), "https://vote.example.com/vote/acme");
    }
}
