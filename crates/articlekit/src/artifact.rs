//! Batch results and the delivery boundary
//!
//! An [`Artifact`] owns the workspace that produced it. Whatever happens
//! while the caller consumes it, the workspace is removed afterwards:
//! explicitly via [`Artifact::deliver_with`], [`Artifact::deliver_to`] or
//! [`Artifact::close`], or implicitly when the artifact is dropped.

use crate::types::{ConvertReport, OutputFormat, Success};
use crate::workspace::Workspace;
use std::io;
use std::path::{Path, PathBuf};

/// Download name used for packaged batches
pub const ARCHIVE_DOWNLOAD_NAME: &str = "articles.zip";

/// The single file handed back for a batch
#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
    format: OutputFormat,
    archive: bool,
    workspace: Workspace,
}

impl Artifact {
    pub(crate) fn new(
        path: PathBuf,
        format: OutputFormat,
        archive: bool,
        workspace: Workspace,
    ) -> Self {
        Self {
            path,
            format,
            archive,
            workspace,
        }
    }

    /// Location of the artifact inside its workspace
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Workspace directory holding the artifact
    pub fn workspace_path(&self) -> &Path {
        self.workspace.path()
    }

    /// True if several documents were packaged into a zip archive
    pub fn is_archive(&self) -> bool {
        self.archive
    }

    /// Format of the packaged documents
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Base name of the artifact file
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// MIME type to announce when serving the artifact
    pub fn content_type(&self) -> &'static str {
        if self.archive {
            "application/zip"
        } else {
            self.format.content_type()
        }
    }

    /// Name to offer the recipient
    pub fn download_name(&self) -> String {
        if self.archive {
            ARCHIVE_DOWNLOAD_NAME.to_string()
        } else {
            self.file_name()
        }
    }

    /// Hand the artifact to `consume`, then remove the workspace
    ///
    /// The workspace is removed on every exit path, including when
    /// `consume` fails or panics. Cleanup errors are logged and never
    /// replace the consumer's result.
    pub fn deliver_with<T, F>(self, consume: F) -> T
    where
        F: FnOnce(&Path) -> T,
    {
        let result = consume(&self.path);
        // Logged by Workspace::close
        let _ = self.close();
        result
    }

    /// Copy the artifact into `dir` under its download name, then remove the workspace
    pub fn deliver_to(self, dir: &Path) -> io::Result<PathBuf> {
        let target = dir.join(self.download_name());
        self.deliver_with(|source| {
            std::fs::create_dir_all(dir)?;
            std::fs::copy(source, &target)?;
            tracing::info!(artifact = %target.display(), "Delivered artifact");
            Ok(target)
        })
    }

    /// Remove the workspace without delivering
    pub fn close(self) -> io::Result<()> {
        self.workspace.close()
    }
}

/// Outcome of a batch that produced at least one document
#[derive(Debug)]
pub struct Conversion {
    /// The file to hand back
    pub artifact: Artifact,
    /// Converted articles, in input order
    pub successes: Vec<Success>,
    /// Failure messages, in input order
    pub failures: Vec<String>,
}

impl Conversion {
    /// True if some URLs failed while others succeeded
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Summarize the batch; `delivered` is where the artifact ended up
    pub fn report(&self, delivered: Option<PathBuf>) -> ConvertReport {
        ConvertReport {
            artifact: delivered,
            content_type: Some(self.artifact.content_type().to_string()),
            converted: self.successes.iter().map(|s| s.title.clone()).collect(),
            failures: self.failures.clone(),
            error: None,
        }
    }
}
