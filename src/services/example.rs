//! Demo example preview
//!
//! The landing page shows a ready-made preview of a real site. The
//! screenshot URL comes from a rate-limited provider, so the last good URL
//! is kept in a single-slot cache with a one-hour TTL; expiry is the only
//! invalidation. Failures fall back to a deterministic thum.io URL that is
//! never cached.

use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;
use url::Url;

use super::screenshot::{MicrolinkProvider, ThumioProvider};

/// Demo site shown on the landing page.
const EXAMPLE_CLIENT_NAME: &str = "ViaSay";
const EXAMPLE_SITE_URL: &str = "https://www.viasay.io";
const EXAMPLE_BUTTON_COLOR: &str = "#0066FF";
const EXAMPLE_PRESENCE_COLOR: &str = "#22c55e";

const CACHE_TTL_SECS: u64 = 3600;
const CACHE_KEY: &str = "example-screenshot";

#[derive(Debug, Clone)]
pub struct ExampleView {
    pub client_name: String,
    pub screenshot_url: String,
    pub button_color: String,
    pub presence_color: String,
}

pub struct ExampleService {
    cache: Cache<&'static str, String>,
    microlink: MicrolinkProvider,
}

impl ExampleService {
    pub fn new() -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
            .max_capacity(1)
            .build();
        Self {
            cache,
            microlink: MicrolinkProvider::new(),
        }
    }

    pub fn get(&self) -> ExampleView {
        let screenshot_url = self.screenshot_url();
        ExampleView {
            client_name: EXAMPLE_CLIENT_NAME.to_string(),
            screenshot_url,
            button_color: EXAMPLE_BUTTON_COLOR.to_string(),
            presence_color: EXAMPLE_PRESENCE_COLOR.to_string(),
        }
    }

    fn screenshot_url(&self) -> String {
        if let Some(cached) = self.cache.get(CACHE_KEY) {
            return cached;
        }

        let site_url = Url::parse(EXAMPLE_SITE_URL).expect("example site URL is valid");
        match self.microlink.screenshot_url(&site_url) {
            Some(url) => {
                self.cache.insert(CACHE_KEY, url.clone());
                url
            }
            None => {
                // Fallback stays uncached so the next call retries the
                // primary provider.
                debug!("example screenshot fell back to thum.io");
                ThumioProvider::capture_url(&site_url)
            }
        }
    }
}

impl Default for ExampleService {
    fn default() -> Self {
        Self::new()
    }
}
