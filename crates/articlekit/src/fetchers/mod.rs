//! Raw content retrieval
//!
//! A [`FetcherRegistry`] holds an ordered list of [`Fetcher`]s and hands
//! each URL to the first one that claims it.

mod default;

pub use default::DefaultFetcher;

use crate::client::FetchOptions;
use crate::error::FetchError;
use async_trait::async_trait;
use url::Url;

/// Source of raw article content
///
/// The pipeline only sees this trait, so tests and callers can swap the
/// network for anything that returns page source.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether this fetcher claims `url`
    fn matches(&self, url: &Url) -> bool;

    /// Retrieve the page source, finishing within `options.timeout`
    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError>;
}

/// Ordered set of fetchers; the first match wins
pub struct FetcherRegistry {
    fetchers: Vec<Box<dyn Fetcher>>,
}

impl Default for FetcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetcherRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.fetchers.iter().map(|f| f.name()).collect();
        f.debug_struct("FetcherRegistry")
            .field("fetchers", &names)
            .finish()
    }
}

impl FetcherRegistry {
    /// Registry without any fetchers
    pub fn new() -> Self {
        Self {
            fetchers: Vec::new(),
        }
    }

    /// Registry holding only [`DefaultFetcher`]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DefaultFetcher::new()));
        registry
    }

    /// Append `fetcher`; earlier registrations take precedence
    pub fn register(&mut self, fetcher: Box<dyn Fetcher>) {
        self.fetchers.push(fetcher);
    }

    /// Number of registered fetchers
    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }

    /// Check scheme and prefix lists, then delegate to the first matching fetcher
    pub async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError> {
        let scheme_ok = ["http://", "https://"].iter().any(|scheme| {
            url.get(..scheme.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
        });
        if !scheme_ok {
            return Err(FetchError::InvalidUrlScheme);
        }
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        if !options.permits(url) {
            return Err(FetchError::BlockedUrl);
        }

        let fetcher = self
            .fetchers
            .iter()
            .find(|fetcher| fetcher.matches(&parsed))
            .ok_or_else(|| FetchError::FetcherError(format!("no fetcher handles {}", url)))?;

        tracing::debug!(fetcher = fetcher.name(), url = %url, "Dispatching fetch");
        fetcher.fetch(url, options).await
    }
}
