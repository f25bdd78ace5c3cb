//! Converter builder and batch orchestration
//!
//! [`Converter::process`] runs every URL of a batch through the per-article
//! pipeline (validate, fetch, extract, name, write) inside one fresh
//! workspace. A failing URL becomes a recorded failure and never stops the
//! rest of the batch. One success is returned as-is; several are packaged
//! into a zip archive.

use crate::archive;
use crate::artifact::{Artifact, Conversion};
use crate::client::{FetchOptions, DEFAULT_TIMEOUT};
use crate::error::BatchError;
use crate::extract::{Extractor, HtmlExtractor};
use crate::fetchers::{DefaultFetcher, Fetcher, FetcherRegistry};
use crate::sanitize::{sanitize_filename, unique_file_name};
use crate::types::{ConversionJob, ConvertRequest, OutputFormat, ProcessingOutcome, Success};
use crate::validate::is_valid_url;
use crate::workspace::Workspace;
use crate::writers::{writer_for, DocumentWriter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Status update during batch processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertStatus {
    /// Current phase ("validate", "fetch", "extract", "write", "package", "complete")
    pub phase: String,
    /// URL being processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Share of the batch already handled, 0 to 100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,
}

impl ConvertStatus {
    /// Status for `phase` with no details
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            url: None,
            message: None,
            percent_complete: None,
        }
    }

    /// Set URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a completion estimate
    pub fn with_percent(mut self, percent: f32) -> Self {
        self.percent_complete = Some(percent);
        self
    }
}

/// Options applied to every batch run by a [`Converter`]
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Options passed to fetchers
    pub fetch: FetchOptions,
    /// Parent directory for workspaces (system temp dir if unset)
    pub workspace_root: Option<PathBuf>,
}

/// Builder for configuring a [`Converter`]
#[derive(Default)]
pub struct ConverterBuilder {
    /// Custom User-Agent
    user_agent: Option<String>,
    /// Per-request timeout
    timeout: Option<Duration>,
    /// Only URLs under these prefixes are fetched
    allow_prefixes: Vec<String>,
    /// URLs under these prefixes are refused
    block_prefixes: Vec<String>,
    /// Parent directory for workspaces
    workspace_root: Option<PathBuf>,
    /// Fetchers checked before the default HTTP fetcher
    fetchers: Vec<Box<dyn Fetcher>>,
    /// Replacement for the HTML extractor
    extractor: Option<Arc<dyn Extractor>>,
}

impl ConverterBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the timeout for each fetch
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Restrict fetching to URLs under `prefix`
    pub fn allow_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.allow_prefixes.push(prefix.into());
        self
    }

    /// Refuse URLs under `prefix`
    pub fn block_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.block_prefixes.push(prefix.into());
        self
    }

    /// Create workspaces under `root` instead of the system temp dir
    pub fn workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(root.into());
        self
    }

    /// Register a fetcher ahead of the default HTTP fetcher
    pub fn fetcher(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.fetchers.push(fetcher);
        self
    }

    /// Replace the built-in HTML extractor
    pub fn extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// Build the converter
    pub fn build(self) -> Converter {
        let mut registry = FetcherRegistry::new();
        for fetcher in self.fetchers {
            registry.register(fetcher);
        }
        // Catch-all goes last
        registry.register(Box::new(DefaultFetcher::new()));

        Converter {
            options: ConvertOptions {
                fetch: FetchOptions {
                    user_agent: self.user_agent,
                    timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
                    allow_prefixes: self.allow_prefixes,
                    block_prefixes: self.block_prefixes,
                },
                workspace_root: self.workspace_root,
            },
            registry: Arc::new(registry),
            extractor: self
                .extractor
                .unwrap_or_else(|| Arc::new(HtmlExtractor::new())),
        }
    }
}

/// Configured batch converter
///
/// Cloning is cheap; clones share fetchers and extractor. Batches run
/// concurrently from clones never share a workspace.
#[derive(Clone)]
pub struct Converter {
    options: ConvertOptions,
    registry: Arc<FetcherRegistry>,
    extractor: Arc<dyn Extractor>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("options", &self.options)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Default for Converter {
    fn default() -> Self {
        ConverterBuilder::new().build()
    }
}

impl Converter {
    /// Create a new converter builder
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::new()
    }

    /// Options applied to every batch
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parse the request's format token, then run [`process`](Self::process)
    pub async fn execute(&self, request: ConvertRequest) -> Result<Conversion, BatchError> {
        let format: OutputFormat = request.format.parse().map_err(BatchError::Validation)?;
        self.process(&request.urls, format).await
    }

    /// Convert a batch of URLs into one artifact
    pub async fn process<S: AsRef<str>>(
        &self,
        urls: &[S],
        format: OutputFormat,
    ) -> Result<Conversion, BatchError> {
        self.process_with_status(urls, format, |_| {}).await
    }

    /// Convert a batch of URLs, reporting progress to `status_callback`
    pub async fn process_with_status<S, F>(
        &self,
        urls: &[S],
        format: OutputFormat,
        mut status_callback: F,
    ) -> Result<Conversion, BatchError>
    where
        S: AsRef<str>,
        F: FnMut(ConvertStatus),
    {
        let urls: Vec<&str> = urls
            .iter()
            .map(|u| u.as_ref().trim())
            .filter(|u| !u.is_empty())
            .collect();
        if urls.is_empty() {
            return Err(BatchError::Validation("No URLs provided".to_string()));
        }

        let workspace =
            Workspace::create(self.options.workspace_root.as_deref()).map_err(BatchError::Workspace)?;
        let writer = writer_for(format);
        let mut taken = HashSet::new();
        let mut successes = Vec::new();
        let mut failures = Vec::new();

        let total = urls.len() as f32;
        for (index, url) in urls.iter().enumerate() {
            let percent = index as f32 / total * 100.0;
            let outcome = self
                .process_one(url, writer.as_ref(), &workspace, &mut taken, |phase| {
                    status_callback(
                        ConvertStatus::new(phase)
                            .with_url(*url)
                            .with_percent(percent),
                    )
                })
                .await;

            match outcome {
                ProcessingOutcome::Success(success) => {
                    info!(url = %success.url, path = %success.path.display(), "Converted article");
                    successes.push(success);
                }
                ProcessingOutcome::Failure(failure) => {
                    warn!(url = %failure.url, reason = %failure.reason, "Article failed");
                    failures.push(failure.to_string());
                }
            }
        }

        if successes.is_empty() {
            status_callback(ConvertStatus::new("complete").with_percent(100.0));
            // Dropping the workspace removes it
            return Err(BatchError::no_successes(failures));
        }

        let artifact = if successes.len() == 1 {
            Artifact::new(successes[0].path.clone(), format, false, workspace)
        } else {
            status_callback(
                ConvertStatus::new("package")
                    .with_message(format!("Packaging {} articles", successes.len()))
                    .with_percent(95.0),
            );
            let paths: Vec<PathBuf> = successes.iter().map(|s| s.path.clone()).collect();
            let archive_path = archive::pack(&paths, workspace.path())?;
            Artifact::new(archive_path, format, true, workspace)
        };

        status_callback(ConvertStatus::new("complete").with_percent(100.0));
        info!(
            artifact = %artifact.path().display(),
            converted = successes.len(),
            failed = failures.len(),
            "Batch finished"
        );

        Ok(Conversion {
            artifact,
            successes,
            failures,
        })
    }

    /// Run one URL through the pipeline; every stage error becomes a failure
    async fn process_one<F>(
        &self,
        url: &str,
        writer: &dyn DocumentWriter,
        workspace: &Workspace,
        taken: &mut HashSet<String>,
        mut phase: F,
    ) -> ProcessingOutcome
    where
        F: FnMut(&'static str),
    {
        phase("validate");
        if !is_valid_url(url) {
            return ProcessingOutcome::failure(url, "invalid URL");
        }

        phase("fetch");
        let raw = match self.registry.fetch(url, &self.options.fetch).await {
            Ok(raw) => raw,
            Err(e) => return ProcessingOutcome::failure(url, e),
        };

        phase("extract");
        let article = match self.extractor.extract(&raw, url) {
            Ok(article) => article,
            Err(e) => return ProcessingOutcome::failure(url, e),
        };

        let format = writer.format();
        let stem = sanitize_filename(&article.title);
        let file_name = unique_file_name(&stem, format.extension(), taken);
        let job = ConversionJob {
            url: url.to_string(),
            format,
            target: workspace.file_path(&file_name),
        };

        phase("write");
        if let Err(e) = writer.write(&article, &job.target) {
            return ProcessingOutcome::failure(url, e);
        }

        ProcessingOutcome::Success(Success {
            url: job.url,
            path: job.target,
            title: article.title,
        })
    }
}
