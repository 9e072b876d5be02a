//! PDF text extractor.
//!
//! Extracts text page by page with pdf-extract and joins the pages in order.

pub mod parser;

pub use parser::PdfExtractor;
