//! XLSX spreadsheet text extractor.
//!
//! Renders the first worksheet as comma-separated rows, header row first.

pub mod parser;

pub use parser::XlsxExtractor;
