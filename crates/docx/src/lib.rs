//! DOCX (Office Open XML) word-document text extractor.
//!
//! Reads the header, body and footer parts of a .docx ZIP archive.

pub mod parser;

pub use parser::DocxExtractor;
