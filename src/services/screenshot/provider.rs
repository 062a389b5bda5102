//! Screenshot provider seam
//!
//! Providers are tried in priority order; each either produces a capture or
//! bows out with `None` so the next one gets a shot. There is no retry
//! within a provider, the chain itself is the fallback strategy.

use url::Url;

/// A captured screenshot: either a hosted image URL or a data URI.
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub screenshot_url: String,
    /// True when `screenshot_url` is an embedded `data:` URI.
    pub is_base64: bool,
    /// Size or quality caveat worth surfacing to the operator.
    pub warning: Option<String>,
}

pub trait ScreenshotProvider: Send + Sync {
    /// Try to capture `url`. `None` means this provider failed and the next
    /// one should be tried.
    fn capture(&self, url: &Url) -> Option<CaptureResult>;

    fn name(&self) -> &'static str;
}
