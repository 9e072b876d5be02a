//! Batch conversion of office documents to plain text.
//!
//! Candidate files are collected from each input root, dispatched to the
//! extractor for their extension, and written below the output directory
//! mirroring their path relative to that input root.

pub mod batch;
pub mod collect;
pub mod dispatch;

pub use batch::{batch_convert, output_location, BatchConfig, BatchReport, ConversionOutcome, Converter};
pub use collect::collect_candidates;
pub use dispatch::{Dispatcher, Extractor, ExtractorTable};
pub use txtify_core::{DocumentKind, Error, ErrorCategory, OutputFormat, Result};
