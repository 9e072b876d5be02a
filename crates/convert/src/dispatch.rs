//! Extension-based dispatch to the per-format extractors.

use log::debug;
use std::path::Path;
use txtify_core::{DocumentKind, Error, Result};
use txtify_docx::DocxExtractor;
use txtify_pdf::PdfExtractor;
use txtify_pptx::PptxExtractor;
use txtify_xlsx::XlsxExtractor;

/// Something that turns a file into text.
pub trait Extractor {
    /// Extract the full text of the file at `path`.
    fn extract(&self, path: &Path) -> Result<String>;
}

impl<F> Extractor for F
where
    F: Fn(&Path) -> Result<String>,
{
    fn extract(&self, path: &Path) -> Result<String> {
        self(path)
    }
}

/// One extractor per [`DocumentKind`].
///
/// Lookup is an exhaustive match, so every kind always has exactly one
/// extractor.
pub struct ExtractorTable {
    pub slide_deck: Box<dyn Extractor>,
    pub word_document: Box<dyn Extractor>,
    pub spreadsheet: Box<dyn Extractor>,
    pub pdf: Box<dyn Extractor>,
}

impl ExtractorTable {
    /// The extractor bound to `kind`.
    pub fn get(&self, kind: DocumentKind) -> &dyn Extractor {
        match kind {
            DocumentKind::SlideDeck => self.slide_deck.as_ref(),
            DocumentKind::WordDocument => self.word_document.as_ref(),
            DocumentKind::Spreadsheet => self.spreadsheet.as_ref(),
            DocumentKind::Pdf => self.pdf.as_ref(),
        }
    }
}

impl Default for ExtractorTable {
    fn default() -> Self {
        Self {
            slide_deck: Box::new(extract_slide_deck),
            word_document: Box::new(extract_word_document),
            spreadsheet: Box::new(extract_spreadsheet),
            pdf: Box::new(extract_pdf),
        }
    }
}

fn extract_slide_deck(path: &Path) -> Result<String> {
    PptxExtractor::new().extract_path(path)
}

fn extract_word_document(path: &Path) -> Result<String> {
    DocxExtractor::new().extract_path(path)
}

fn extract_spreadsheet(path: &Path) -> Result<String> {
    XlsxExtractor::new().extract_path(path)
}

fn extract_pdf(path: &Path) -> Result<String> {
    PdfExtractor::new().extract_path(path)
}

/// Selects and runs the extractor for a file based on its extension.
#[derive(Default)]
pub struct Dispatcher {
    table: ExtractorTable,
}

impl Dispatcher {
    /// Dispatcher wired to the built-in extractors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher using a custom extractor table.
    pub fn with_table(table: ExtractorTable) -> Self {
        Self { table }
    }

    /// Determine the kind of `path` from its extension alone.
    pub fn kind_of(path: &Path) -> Result<DocumentKind> {
        DocumentKind::from_path(path).ok_or_else(|| Error::UnsupportedFormat(describe_extension(path)))
    }

    /// Extract the text of `path`, returning the detected kind with it.
    ///
    /// Fails with [`Error::UnsupportedFormat`] before any extractor runs when
    /// the extension is not recognised.
    pub fn dispatch(&self, path: &Path) -> Result<(DocumentKind, String)> {
        let kind = Self::kind_of(path)?;
        debug!("Dispatching {} as {}", path.display(), kind);

        let text = self.table.get(kind).extract(path)?;
        Ok((kind, text))
    }

    /// Extract the text of `path`.
    pub fn extract(&self, path: &Path) -> Result<String> {
        self.dispatch(path).map(|(_, text)| text)
    }
}

fn describe_extension(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => format!("{} has no extension", path.display()),
    }
}
