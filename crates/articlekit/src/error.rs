//! Error types for ArticleKit
//!
//! Stage errors ([`FetchError`], [`ExtractError`], [`WriteError`],
//! [`PackagingError`]) never escape a single URL's pipeline; the batch
//! only ever fails with a [`BatchError`].

use std::io;
use thiserror::Error;

/// Errors raised while retrieving raw content for a URL
#[derive(Debug, Error)]
pub enum FetchError {
    /// Scheme is neither http nor https
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Scheme is fine but the URL does not parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Rejected by the allow or block prefix list
    #[error("Blocked URL: prefix not allowed")]
    BlockedUrl,

    /// reqwest client could not be configured
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// No connection to the host
    #[error("Could not connect to {0}")]
    ConnectError(String),

    /// Server answered with a 4xx/5xx status
    #[error("HTTP error {0}")]
    HttpStatus(u16),

    /// Other request error
    #[error("Failed to fetch URL: {0}")]
    RequestError(String),

    /// Raised by a particular fetcher, e.g. non-text content
    #[error("Fetcher error: {0}")]
    FetcherError(String),
}

impl FetchError {
    /// Classify a reqwest failure for `url`
    pub fn from_reqwest(err: reqwest::Error, url: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout_secs)
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus(status.as_u16())
        } else if err.is_connect() {
            FetchError::ConnectError(url.to_string())
        } else {
            FetchError::RequestError(err.to_string())
        }
    }
}

/// Errors raised while deriving title and text from raw content
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Nothing readable was found
    #[error("No article text could be extracted")]
    EmptyText,

    /// Text exists but is below the minimum length
    #[error("Extracted text is too short (less than {min} characters)")]
    TooShort { min: usize, actual: usize },

    /// Extractor-specific error
    #[error("Failed to parse article: {0}")]
    Other(String),
}

/// Errors raised by a document writer
#[derive(Debug, Error)]
pub enum WriteError {
    /// Article has no text to render
    #[error("No text content to convert")]
    MissingText,

    /// Filesystem error while writing the output file
    #[error("Failed to write {format} file: {source}")]
    Io {
        format: &'static str,
        #[source]
        source: io::Error,
    },

    /// PDF serialization error
    #[error("Failed to create PDF file: {0}")]
    Pdf(String),
}

/// Errors raised while bundling outputs into an archive
#[derive(Debug, Error)]
pub enum PackagingError {
    /// Filesystem error while reading inputs or writing the archive
    #[error("Failed to package articles: {0}")]
    Io(#[from] io::Error),

    /// Zip encoder error
    #[error("Failed to package articles: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Input path has no usable file name
    #[error("Cannot package {0}: path has no file name")]
    NoFileName(String),
}

/// Terminal errors for a whole batch
#[derive(Debug, Error)]
pub enum BatchError {
    /// Preconditions failed before any work started
    #[error("{0}")]
    Validation(String),

    /// No URL produced a document
    #[error("{message}")]
    Processing {
        message: String,
        failures: Vec<String>,
    },

    /// The batch workspace could not be allocated
    #[error("Failed to create workspace: {0}")]
    Workspace(#[source] io::Error),

    /// Multiple documents were produced but could not be bundled
    #[error(transparent)]
    Packaging(#[from] PackagingError),
}

impl BatchError {
    /// Build the aggregate error for a batch where every URL failed
    pub fn no_successes(failures: Vec<String>) -> Self {
        let mut message = "No articles could be processed.".to_string();
        if !failures.is_empty() {
            message.push_str(" Errors: ");
            message.push_str(&failures.join("; "));
        }
        BatchError::Processing { message, failures }
    }

    /// Failure messages recorded before the batch failed
    pub fn failures(&self) -> &[String] {
        match self {
            BatchError::Processing { failures, .. } => failures,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::InvalidUrlScheme.to_string(),
            "Invalid URL: must start with http:// or https://"
        );
        assert_eq!(
            FetchError::InvalidUrl("invalid port number".to_string()).to_string(),
            "Invalid URL: invalid port number"
        );
        assert_eq!(
            FetchError::BlockedUrl.to_string(),
            "Blocked URL: prefix not allowed"
        );
        assert_eq!(
            FetchError::Timeout(10).to_string(),
            "Request timed out after 10 seconds"
        );
        assert_eq!(FetchError::HttpStatus(404).to_string(), "HTTP error 404");
        assert_eq!(
            ExtractError::TooShort {
                min: 100,
                actual: 99
            }
            .to_string(),
            "Extracted text is too short (less than 100 characters)"
        );
        assert_eq!(
            WriteError::MissingText.to_string(),
            "No text content to convert"
        );
    }

    #[test]
    fn test_no_successes_message() {
        let err = BatchError::no_successes(vec![
            "Failed to process a: invalid URL".to_string(),
            "Failed to process b: HTTP error 500".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "No articles could be processed. Errors: Failed to process a: invalid URL; Failed to process b: HTTP error 500"
        );
        assert_eq!(err.failures().len(), 2);
    }

    #[test]
    fn test_no_successes_without_failures() {
        let err = BatchError::no_successes(Vec::new());
        assert_eq!(err.to_string(), "No articles could be processed.");
        assert!(err.failures().is_empty());
    }
}
