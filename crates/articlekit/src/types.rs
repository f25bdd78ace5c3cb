//! Core types for ArticleKit

use crate::error::ExtractError;
use crate::MIN_TEXT_LENGTH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain UTF-8 text
    Txt,
    /// PDF document
    Pdf,
}

impl OutputFormat {
    /// All supported formats
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Txt, OutputFormat::Pdf];

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// MIME type of a single document in this format
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "text/plain",
            OutputFormat::Pdf => "application/pdf",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(format!("Invalid format: {}. Choose from: txt, pdf", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Title and body text extracted from one article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleData {
    pub title: String,
    pub text: String,
}

impl ArticleData {
    /// Build article data, enforcing the minimum text length
    ///
    /// Both fields are trimmed. A blank title becomes `Untitled`; blank
    /// text or text shorter than [`MIN_TEXT_LENGTH`] characters is rejected.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Result<Self, ExtractError> {
        let title = title.into();
        let text = text.into();
        let title = match title.trim() {
            "" => "Untitled".to_string(),
            t => t.to_string(),
        };
        let text = text.trim().to_string();

        if text.is_empty() {
            return Err(ExtractError::EmptyText);
        }
        let actual = text.chars().count();
        if actual < MIN_TEXT_LENGTH {
            return Err(ExtractError::TooShort {
                min: MIN_TEXT_LENGTH,
                actual,
            });
        }

        Ok(Self { title, text })
    }
}

/// One unit of work: convert `url` into `format` at `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub url: String,
    pub format: OutputFormat,
    pub target: PathBuf,
}

/// A document produced for one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Success {
    pub url: String,
    pub path: PathBuf,
    pub title: String,
}

/// A URL that produced no document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub url: String,
    pub reason: String,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to process {}: {}", self.url, self.reason)
    }
}

/// Per-URL result of the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Success(Success),
    Failure(Failure),
}

impl ProcessingOutcome {
    pub(crate) fn failure(url: &str, reason: impl std::fmt::Display) -> Self {
        ProcessingOutcome::Failure(Failure {
            url: url.to_string(),
            reason: reason.to_string(),
        })
    }
}

/// Batch conversion request as received from a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertRequest {
    /// Raw URL strings, in order
    pub urls: Vec<String>,

    /// Format token (`txt` or `pdf`)
    pub format: String,
}

impl ConvertRequest {
    /// Create a new request
    pub fn new(urls: Vec<String>, format: impl Into<String>) -> Self {
        Self {
            urls,
            format: format.into(),
        }
    }

    /// Create a request from newline-separated URL text
    pub fn from_text(text: &str, format: impl Into<String>) -> Self {
        Self::new(parse_url_list(text), format)
    }
}

/// Summary of a finished batch, suitable for JSON output
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertReport {
    /// Where the artifact was delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,

    /// MIME type of the artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Titles of converted articles, in input order
    pub converted: Vec<String>,

    /// Failure messages, in input order
    pub failures: Vec<String>,

    /// Terminal error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Split newline-separated text into trimmed, non-blank URL strings
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
