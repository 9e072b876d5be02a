//! Core document kinds, error types, text normalization, and output
//! rendering for office-to-text conversion.

pub mod error;
pub mod normalize;
pub mod ooxml;
pub mod render;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use normalize::{join_lines, normalize_line_endings, trim_blank_lines};
pub use render::{render, OutputFormat};
pub use types::{DocumentKind, ExtractedSlide, Presentation};
