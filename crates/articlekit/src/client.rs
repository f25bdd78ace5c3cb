//! Fetch options and one-shot fetch helpers
//!
//! The request itself is made by a [`Fetcher`](crate::fetchers::Fetcher);
//! these helpers run a URL through the default registry.

use crate::error::FetchError;
use crate::fetchers::FetcherRegistry;
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetch options shared by all fetchers
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Timeout for a single request (connect + full body)
    pub timeout: Duration,
    /// Allow list of URL prefixes
    pub allow_prefixes: Vec<String>,
    /// Block list of URL prefixes
    pub block_prefixes: Vec<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            allow_prefixes: Vec::new(),
            block_prefixes: Vec::new(),
        }
    }
}

/// Fetch page source with default options
pub async fn fetch(url: &str) -> Result<String, FetchError> {
    fetch_with_options(url, &FetchOptions::default()).await
}

/// Fetch page source through the default registry
pub async fn fetch_with_options(url: &str, options: &FetchOptions) -> Result<String, FetchError> {
    FetcherRegistry::with_defaults().fetch(url, options).await
}

impl FetchOptions {
    /// Whether `url` passes the allow and block prefix lists
    pub fn permits(&self, url: &str) -> bool {
        let allowed = self.allow_prefixes.is_empty()
            || self.allow_prefixes.iter().any(|p| url.starts_with(p.as_str()));
        allowed && !self.block_prefixes.iter().any(|p| url.starts_with(p.as_str()))
    }
}
