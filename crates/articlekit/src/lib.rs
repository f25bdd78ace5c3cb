//! ArticleKit - batch conversion of web articles into documents
//!
//! This crate turns a list of article URLs into plain text or PDF
//! documents. Each URL runs through its own pipeline:
//!
//! 1. [`validate`] - structural URL check
//! 2. [`fetchers`] - raw content retrieval via the [`FetcherRegistry`]
//! 3. [`extract`] - title and body text extraction
//! 4. [`sanitize`] - safe, unique output file names
//! 5. [`writers`] - rendering with a [`DocumentWriter`]
//!
//! A failing URL is recorded and skipped; it never aborts the batch. A
//! single result is returned as-is, several are bundled into a zip
//! archive. Every batch works inside its own [`Workspace`], which is
//! removed once the caller has consumed the [`Artifact`].
//!
//! ```no_run
//! use articlekit::{Converter, OutputFormat};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let converter = Converter::default();
//! let conversion = converter
//!     .process(&["https://example.com/story"], OutputFormat::Pdf)
//!     .await?;
//! for failure in &conversion.failures {
//!     eprintln!("{}", failure);
//! }
//! let delivered = conversion.artifact.deliver_to(std::path::Path::new("."))?;
//! println!("{}", delivered.display());
//! # Ok(())
//! # }
//! ```

pub mod archive;
mod artifact;
pub mod client;
mod converter;
mod error;
pub mod extract;
pub mod fetchers;
pub mod sanitize;
mod types;
pub mod validate;
pub mod workspace;
pub mod writers;

pub use artifact::{Artifact, Conversion, ARCHIVE_DOWNLOAD_NAME};
pub use client::{fetch, fetch_with_options, FetchOptions};
pub use converter::{ConvertOptions, ConvertStatus, Converter, ConverterBuilder};
pub use error::{BatchError, ExtractError, FetchError, PackagingError, WriteError};
pub use extract::{Extractor, HtmlExtractor};
pub use fetchers::{DefaultFetcher, Fetcher, FetcherRegistry};
pub use sanitize::sanitize_filename;
pub use types::{
    parse_url_list, ArticleData, ConversionJob, ConvertReport, ConvertRequest, Failure,
    OutputFormat, ProcessingOutcome, Success,
};
pub use validate::is_valid_url;
pub use workspace::Workspace;
pub use writers::{writer_for, DocumentWriter, PdfWriter, TxtWriter};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (compatible; ArticleKit/1.0)";

/// Minimum number of characters an extracted article must contain
pub const MIN_TEXT_LENGTH: usize = 100;
