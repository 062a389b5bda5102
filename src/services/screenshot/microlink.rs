//! Microlink screenshot provider
//!
//! Free screenshot API, first in the chain: fast and returns a hosted image
//! URL that can be referenced externally without re-uploading.

use std::time::Duration;

use tracing::debug;
use url::Url;
use ureq::Agent;

use super::provider::{CaptureResult, ScreenshotProvider};

const MICROLINK_TIMEOUT_SECS: u64 = 8;

pub struct MicrolinkProvider {
    agent: Agent,
}

impl MicrolinkProvider {
    pub fn new() -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(MICROLINK_TIMEOUT_SECS)))
            .build()
            .into();
        Self { agent }
    }

    /// Hosted screenshot URL for a target, or `None` on any failure.
    pub fn screenshot_url(&self, target: &Url) -> Option<String> {
        let api_url = format!(
            "https://api.microlink.io/?url={}&screenshot=true&meta=false&viewport.width=1280&viewport.height=720",
            urlencoding::encode(target.as_str())
        );

        let response = match self.agent.get(&api_url).header("Accept", "application/json").call()
        {
            Ok(response) => response,
            Err(e) => {
                debug!("microlink request failed: {e}");
                return None;
            }
        };

        let json: serde_json::Value = match response.into_body().read_json() {
            Ok(json) => json,
            Err(e) => {
                debug!("microlink response parse failed: {e}");
                return None;
            }
        };

        json["data"]["screenshot"]["url"]
            .as_str()
            .map(String::from)
    }
}

impl Default for MicrolinkProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenshotProvider for MicrolinkProvider {
    fn capture(&self, url: &Url) -> Option<CaptureResult> {
        self.screenshot_url(url).map(|screenshot_url| CaptureResult {
            screenshot_url,
            is_base64: false,
            warning: None,
        })
    }

    fn name(&self) -> &'static str {
        "microlink"
    }
}
