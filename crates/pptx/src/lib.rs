//! PPTX (Office Open XML) slide-deck text extractor.
//!
//! Parses .pptx files which are ZIP archives containing XML documents.

pub mod parser;

pub use parser::PptxExtractor;
