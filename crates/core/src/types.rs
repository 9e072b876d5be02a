//! Domain types for supported document kinds and extracted slide content.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// The kinds of document that can be converted to text.
///
/// Each kind is bound to exactly one file extension. Both directions of that
/// mapping are exhaustive matches, so adding a kind without an extension (or
/// the other way round) does not compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    /// PowerPoint deck (`.pptx`).
    SlideDeck,
    /// Word document (`.docx`).
    WordDocument,
    /// Excel workbook (`.xlsx`).
    Spreadsheet,
    /// Portable Document Format (`.pdf`).
    Pdf,
}

impl DocumentKind {
    /// Every supported kind.
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::SlideDeck,
        DocumentKind::WordDocument,
        DocumentKind::Spreadsheet,
        DocumentKind::Pdf,
    ];

    /// Detect kind from a file extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::SlideDeck),
            "docx" => Some(Self::WordDocument),
            "xlsx" => Some(Self::Spreadsheet),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Detect kind from the extension of a path's final component.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether the path carries a supported extension.
    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_some()
    }

    /// Canonical lowercase extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::SlideDeck => "pptx",
            Self::WordDocument => "docx",
            Self::Spreadsheet => "xlsx",
            Self::Pdf => "pdf",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SlideDeck => "slide deck",
            Self::WordDocument => "word document",
            Self::Spreadsheet => "spreadsheet",
            Self::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

/// An entire slide deck with its extracted paragraphs.
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    /// Slides in deck order.
    pub slides: Vec<ExtractedSlide>,
}

impl Presentation {
    /// Create an empty presentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: ExtractedSlide) {
        self.slides.push(slide);
    }

    /// Get all paragraphs from all slides, flattened.
    pub fn all_lines(&self) -> Vec<&str> {
        self.slides
            .iter()
            .flat_map(|s| s.paragraphs.iter().map(String::as_str))
            .collect()
    }

    /// All paragraphs, one per line, without slide separators.
    pub fn to_text(&self) -> String {
        self.all_lines().join("\n")
    }
}

/// A single extracted slide.
#[derive(Debug, Clone)]
pub struct ExtractedSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Paragraph text in shape order, empty paragraphs included.
    pub paragraphs: Vec<String>,
}

impl ExtractedSlide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            paragraphs: Vec::new(),
        }
    }

    /// Add a paragraph to this slide.
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.paragraphs.push(text.into());
    }
}
