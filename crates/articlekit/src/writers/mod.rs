//! Document writers, one per output format

mod pdf;
mod txt;

pub use pdf::PdfWriter;
pub use txt::TxtWriter;

use crate::error::WriteError;
use crate::types::{ArticleData, OutputFormat};
use std::path::Path;

/// Renders an article into a file at `path`
pub trait DocumentWriter: Send + Sync {
    /// Format this writer produces
    fn format(&self) -> OutputFormat;

    /// Write `article` to `path`, replacing any existing file
    fn write(&self, article: &ArticleData, path: &Path) -> Result<(), WriteError>;
}

/// Return the built-in writer for `format`
pub fn writer_for(format: OutputFormat) -> Box<dyn DocumentWriter> {
    match format {
        OutputFormat::Txt => Box::new(TxtWriter),
        OutputFormat::Pdf => Box::new(PdfWriter::default()),
    }
}
