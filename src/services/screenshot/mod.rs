//! Site screenshot capture
//!
//! A prioritized chain of external providers: the first one to produce an
//! image wins, exhaustion degrades to a manual-upload hint rather than a
//! hard failure. The favicon URL is computed up front and returned even
//! when every provider fails.

pub mod microlink;
pub mod pagespeed;
pub mod provider;
pub mod thumio;

pub use microlink::MicrolinkProvider;
pub use pagespeed::PagespeedProvider;
pub use provider::{CaptureResult, ScreenshotProvider};
pub use thumio::ThumioProvider;

use tracing::{info, warn};
use url::Url;

use crate::errors::{Result, VotelinkerError};
use crate::utils::{validate_url, validation_error_message};

/// Message shown when every provider failed.
const EXHAUSTED_MESSAGE: &str =
    "Impossible de capturer ce site. Vous pouvez coller une capture manuellement.";

/// Outcome of a capture attempt. Provider exhaustion is not an error: the
/// favicon is still usable and the operator can paste an image by hand.
#[derive(Debug, Clone)]
pub struct ScreenshotOutcome {
    pub screenshot_url: Option<String>,
    pub favicon: String,
    pub source: Option<&'static str>,
    pub is_base64: bool,
    pub warning: Option<String>,
    pub error: Option<String>,
}

pub struct ScreenshotService {
    providers: Vec<Box<dyn ScreenshotProvider>>,
}

impl ScreenshotService {
    pub fn new(providers: Vec<Box<dyn ScreenshotProvider>>) -> Self {
        Self { providers }
    }

    /// The production chain, fastest and cheapest first.
    pub fn with_default_providers() -> Self {
        Self::new(vec![
            Box::new(MicrolinkProvider::new()),
            Box::new(ThumioProvider::new()),
            Box::new(PagespeedProvider::new()),
        ])
    }

    pub fn capture(&self, raw_url: &str) -> Result<ScreenshotOutcome> {
        let url = validate_url(raw_url)
            .map_err(|e| VotelinkerError::validation(validation_error_message(&e)))?;

        let favicon = favicon_url(&url);

        for provider in &self.providers {
            if let Some(capture) = provider.capture(&url) {
                info!("screenshot of {} captured via {}", url, provider.name());
                return Ok(ScreenshotOutcome {
                    screenshot_url: Some(capture.screenshot_url),
                    favicon,
                    source: Some(provider.name()),
                    is_base64: capture.is_base64,
                    warning: capture.warning,
                    error: None,
                });
            }
            warn!("screenshot provider {} failed for {}", provider.name(), url);
        }

        Ok(ScreenshotOutcome {
            screenshot_url: None,
            favicon,
            source: None,
            is_base64: false,
            warning: None,
            error: Some(EXHAUSTED_MESSAGE.to_string()),
        })
    }
}

/// Favicon CDN URL for a site.
pub fn favicon_url(url: &Url) -> String {
    format!(
        "https://www.google.com/s2/favicons?domain={}&sz=64",
        url.host_str().unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(Option<&'static str>);

    impl ScreenshotProvider for FixedProvider {
        fn capture(&self, _url: &Url) -> Option<CaptureResult> {
            self.0.map(|u| CaptureResult {
                screenshot_url: u.to_string(),
                is_base64: false,
                warning: None,
            })
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_first_successful_provider_wins() {
        let service = ScreenshotService::new(vec![
            Box::new(FixedProvider(None)),
            Box::new(FixedProvider(Some("https://shots.example/a.png"))),
            Box::new(FixedProvider(Some("https://shots.example/b.png"))),
        ]);
        let outcome = service.capture("https://www.example.com").unwrap();
        assert_eq!(
            outcome.screenshot_url.as_deref(),
            Some("https://shots.example/a.png")
        );
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_exhausted_chain_degrades_with_favicon() {
        let service = ScreenshotService::new(vec![Box::new(FixedProvider(None))]);
        let outcome = service.capture("https://www.example.com").unwrap();
        assert!(outcome.screenshot_url.is_none());
        assert!(outcome.error.is_some());
        assert!(outcome.favicon.contains("example.com"));
    }

    #[test]
    fn test_invalid_url_is_a_validation_error() {
        let service = ScreenshotService::new(Vec::new());
        let err = service.capture("ftp://example.com").unwrap_err();
        assert!(matches!(err, VotelinkerError::Validation(_)));
    }
}
