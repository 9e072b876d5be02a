//! Output rendering of extracted text.
//!
//! Rendering is applied after extraction and never changes the extracted
//! text itself. Plain text is the default and writes the text unchanged.

use crate::{DocumentKind, Error, Result};
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;

/// Format of the files written by a batch conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Extracted text as-is.
    #[default]
    Text,
    /// Extracted text under a heading naming the source file.
    Markdown,
    /// A JSON object carrying source, kind and text.
    Json,
}

impl OutputFormat {
    /// Extension of files written in this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown output format '{}' (expected txt, markdown or json)",
                other
            )),
        }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    source: String,
    kind: DocumentKind,
    text: &'a str,
}

/// Render extracted text from `source` in the given format.
pub fn render(format: OutputFormat, source: &Path, kind: DocumentKind, text: &str) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text.to_string()),
        OutputFormat::Markdown => {
            let title = source
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| source.to_string_lossy());
            Ok(format!("# {}\n\n{}\n", title, text))
        }
        OutputFormat::Json => {
            let doc = JsonDocument {
                source: source.display().to_string(),
                kind,
                text,
            };
            serde_json::to_string_pretty(&doc).map_err(|e| Error::Render(e.to_string()))
        }
    }
}
