//! Text normalization shared by the extractors.
//!
//! Every extractor hands back `\n`-separated text regardless of what the
//! underlying library produced.

use regex::Regex;
use std::sync::LazyLock;

/// Regex matching Windows and classic Mac line endings.
static LINE_ENDING_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n?").unwrap());

/// Convert `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    LINE_ENDING_REGEX.replace_all(text, "\n").into_owned()
}

/// Join lines with `\n`.
pub fn join_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, line) in lines.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

/// Drop whitespace-only lines from the start and end of the text.
///
/// Interior blank lines are kept.
pub fn trim_blank_lines(text: &str) -> &str {
    let lines: Vec<&str> = text.split('\n').collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());

    match (first, last) {
        (Some(first), Some(last)) => {
            let start: usize = lines[..first].iter().map(|l| l.len() + 1).sum();
            let end: usize = start
                + lines[first..=last].iter().map(|l| l.len() + 1).sum::<usize>()
                - 1;
            &text[start..end]
        }
        _ => "",
    }
}
