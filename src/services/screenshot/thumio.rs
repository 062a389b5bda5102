//! Thum.io screenshot provider
//!
//! Second in the chain. The image URL is deterministic; a HEAD probe checks
//! the service will actually render the target before the URL is handed out.

use std::time::Duration;

use tracing::debug;
use url::Url;
use ureq::Agent;

use super::provider::{CaptureResult, ScreenshotProvider};

const THUMIO_TIMEOUT_SECS: u64 = 5;

pub struct ThumioProvider {
    agent: Agent,
}

impl ThumioProvider {
    pub fn new() -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(THUMIO_TIMEOUT_SECS)))
            .build()
            .into();
        Self { agent }
    }

    /// The deterministic capture URL for a target.
    pub fn capture_url(target: &Url) -> String {
        format!(
            "https://image.thum.io/get/width/1280/crop/720/noanimate/{}",
            target
        )
    }
}

impl Default for ThumioProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenshotProvider for ThumioProvider {
    fn capture(&self, url: &Url) -> Option<CaptureResult> {
        let capture_url = Self::capture_url(url);

        match self.agent.head(&capture_url).call() {
            Ok(_) => Some(CaptureResult {
                screenshot_url: capture_url,
                is_base64: false,
                warning: None,
            }),
            Err(e) => {
                debug!("thum.io probe failed: {e}");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "thumio"
    }
}
