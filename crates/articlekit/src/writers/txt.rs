//! Plain text writer

use crate::error::WriteError;
use crate::types::{ArticleData, OutputFormat};
use crate::writers::DocumentWriter;
use std::path::Path;

/// Writes the title, an `=` underline, a blank line, then the text
#[derive(Debug, Clone, Copy, Default)]
pub struct TxtWriter;

impl TxtWriter {
    /// Render the document body
    pub fn render(article: &ArticleData) -> String {
        let underline = "=".repeat(article.title.chars().count());
        format!("{}\n{}\n\n{}", article.title, underline, article.text)
    }
}

impl DocumentWriter for TxtWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Txt
    }

    fn write(&self, article: &ArticleData, path: &Path) -> Result<(), WriteError> {
        if article.text.is_empty() {
            return Err(WriteError::MissingText);
        }
        std::fs::write(path, Self::render(article)).map_err(|source| WriteError::Io {
            format: "TXT",
            source,
        })
    }
}
