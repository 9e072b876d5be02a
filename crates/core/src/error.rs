//! Error types for document conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting or writing converted text.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file extension has no registered extractor.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// ZIP archive error (for PPTX and DOCX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX and DOCX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The PDF could not be parsed.
    #[error("PDF error: {0}")]
    PdfError(String),

    /// The workbook could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),

    /// Could not create a directory below the output root.
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write a converted file.
    #[error("Failed to write {}: {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create the output root. Fatal for a whole batch.
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to render extracted text into the requested output format.
    #[error("Failed to render output: {0}")]
    Render(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// No extractor exists for the file's extension.
    UnsupportedFormat,
    /// The input could not be read or parsed.
    Extraction,
    /// Writing the converted output failed.
    Io,
}

impl Error {
    /// Map this error onto its category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnsupportedFormat(_) => ErrorCategory::UnsupportedFormat,
            Error::IoError(_)
            | Error::ZipError(_)
            | Error::XmlError(_)
            | Error::PdfError(_)
            | Error::SpreadsheetError(_)
            | Error::CorruptedFile(_) => ErrorCategory::Extraction,
            Error::CreateDirectory { .. }
            | Error::WriteOutput { .. }
            | Error::OutputRoot { .. }
            | Error::Render(_) => ErrorCategory::Io,
        }
    }

    /// Whether this error aborts a whole batch rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::OutputRoot { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            Error::UnsupportedFormat(".txt".into()).category(),
            ErrorCategory::UnsupportedFormat
        );
        assert_eq!(
            Error::ZipError("bad header".into()).category(),
            ErrorCategory::Extraction
        );
        let write = Error::WriteOutput {
            path: PathBuf::from("out/a.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(write.category(), ErrorCategory::Io);
        assert!(!write.is_fatal());
    }

    #[test]
    fn test_output_root_is_fatal() {
        let err = Error::OutputRoot {
            path: PathBuf::from("/nope/out"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("/nope/out"));
    }
}
