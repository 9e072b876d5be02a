//! PDF parser implementation.

use log::{debug, warn};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use txtify_core::{join_lines, normalize_line_endings, Error, Result};

/// Extractor for PDF files.
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of the PDF stored at `path`.
    pub fn extract_path(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        debug!("PDF {}: {} bytes", path.display(), bytes.len());
        self.extract_bytes(&bytes)
    }

    /// Extract text from an in-memory PDF.
    ///
    /// pdf-extract can panic on malformed fonts; such panics are reported as
    /// [`Error::PdfError`].
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(bytes)
        }))
        .map_err(|_| {
            warn!("pdf-extract panicked while reading a PDF");
            Error::PdfError("PDF extraction panicked on malformed content".to_string())
        })?
        .map_err(|e| Error::PdfError(e.to_string()))?;

        debug!("PDF: {} pages", pages.len());
        Ok(join_pages(&pages))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Join per-page text with newlines, in page order.
///
/// A page without text contributes an empty segment.
fn join_pages(pages: &[String]) -> String {
    normalize_line_endings(&join_lines(pages))
}
