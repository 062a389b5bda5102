//! PageSpeed screenshot provider
//!
//! Last resort: the performance-audit API embeds a final screenshot as a
//! base64 data URI. Slow, and the payload can be too large to re-upload
//! comfortably, so captures over 1 MB carry a warning.

use std::time::Duration;

use tracing::debug;
use url::Url;
use ureq::Agent;

use super::provider::{CaptureResult, ScreenshotProvider};

const PAGESPEED_TIMEOUT_SECS: u64 = 15;

/// Base64 payloads above this many bytes get a size warning.
const LARGE_PAYLOAD_BYTES: usize = 1_000_000;

pub struct PagespeedProvider {
    agent: Agent,
}

impl PagespeedProvider {
    pub fn new() -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(PAGESPEED_TIMEOUT_SECS)))
            .build()
            .into();
        Self { agent }
    }
}

impl Default for PagespeedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenshotProvider for PagespeedProvider {
    fn capture(&self, url: &Url) -> Option<CaptureResult> {
        let api_url = format!(
            "https://www.googleapis.com/pagespeedonline/v5/runPagespeed?url={}&strategy=desktop&category=performance",
            urlencoding::encode(url.as_str())
        );

        let response = match self.agent.get(&api_url).call() {
            Ok(response) => response,
            Err(e) => {
                debug!("pagespeed request failed: {e}");
                return None;
            }
        };

        let json: serde_json::Value = match response.into_body().read_json() {
            Ok(json) => json,
            Err(e) => {
                debug!("pagespeed response parse failed: {e}");
                return None;
            }
        };

        let screenshot = json["lighthouseResult"]["audits"]["final-screenshot"]["details"]["data"]
            .as_str()?
            .to_string();

        let warning = (screenshot.len() > LARGE_PAYLOAD_BYTES)
            .then(|| "Screenshot is large and may cause upload issues".to_string());

        Some(CaptureResult {
            screenshot_url: screenshot,
            is_base64: true,
            warning,
        })
    }

    fn name(&self) -> &'static str {
        "pagespeed"
    }
}
