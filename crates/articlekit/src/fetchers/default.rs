//! Plain HTTP(S) fetcher, registered last as the catch-all

use crate::client::FetchOptions;
use crate::error::FetchError;
use crate::fetchers::Fetcher;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use url::Url;

const ACCEPT_HTML: &str = "text/html, application/xhtml+xml, */*;q=0.8";

/// Media types that never carry article markup
const NON_TEXT_MEDIA: &[&str] = &[
    "image/",
    "audio/",
    "video/",
    "font/",
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/gzip",
];

/// Single GET per URL, bounded by `options.timeout`
///
/// Error statuses surface as [`FetchError::HttpStatus`]; responses whose
/// content type is clearly not text are refused before the body is read.
#[derive(Debug, Default)]
pub struct DefaultFetcher;

impl DefaultFetcher {
    pub fn new() -> Self {
        Self
    }

    fn client(options: &FetchOptions) -> Result<Client, FetchError> {
        let agent = options
            .user_agent
            .as_deref()
            .and_then(|ua| HeaderValue::from_str(ua).ok())
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_USER_AGENT));

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        Client::builder()
            .default_headers(headers)
            .connect_timeout(options.timeout)
            .timeout(options.timeout)
            .build()
            .map_err(FetchError::ClientBuildError)
    }
}

#[async_trait]
impl Fetcher for DefaultFetcher {
    fn name(&self) -> &'static str {
        "default"
    }

    fn matches(&self, _url: &Url) -> bool {
        true
    }

    async fn fetch(&self, url: &str, options: &FetchOptions) -> Result<String, FetchError> {
        let secs = options.timeout.as_secs();
        let classify = |e: reqwest::Error| FetchError::from_reqwest(e, url, secs);

        let response = Self::client(options)?
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(classify)?;

        let media = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if is_non_text(media) {
            return Err(FetchError::FetcherError(format!(
                "unsupported content type {}",
                media
            )));
        }

        let body = response.text().await.map_err(classify)?;
        tracing::debug!(url = %url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

fn is_non_text(media: &str) -> bool {
    let media = media.trim().to_ascii_lowercase();
    NON_TEXT_MEDIA.iter().any(|prefix| media.starts_with(prefix))
}
