//! Favicon proxy
//!
//! Fetches a site's favicon from the public CDN and re-serves it from our
//! origin, so the browser canvas can draw it without tainting.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::errors::{Result, VotelinkerError};

const FAVICON_TIMEOUT_SECS: u64 = 5;

/// Favicon bytes plus the content type the CDN reported.
#[derive(Debug, Clone)]
pub struct FaviconImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

pub struct FaviconService {
    agent: Agent,
}

impl FaviconService {
    pub fn new() -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(FAVICON_TIMEOUT_SECS)))
            .build()
            .into();
        Self { agent }
    }

    pub fn fetch(&self, domain: &str, size: u32) -> Result<FaviconImage> {
        let url = format!(
            "https://www.google.com/s2/favicons?domain={}&sz={}",
            urlencoding::encode(domain),
            size
        );
        debug!("fetching favicon: {url}");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| VotelinkerError::upstream_unavailable(format!("favicon fetch: {e}")))?;

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();

        let bytes = response
            .into_body()
            .read_to_vec()
            .map_err(|e| VotelinkerError::upstream_unavailable(format!("favicon read: {e}")))?;

        Ok(FaviconImage {
            bytes,
            content_type,
        })
    }
}

impl Default for FaviconService {
    fn default() -> Self {
        Self::new()
    }
}
