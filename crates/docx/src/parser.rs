//! DOCX file parser implementation.

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use txtify_core::ooxml::{local_name, read_file_from_archive};
use txtify_core::{join_lines, normalize_line_endings, trim_blank_lines, Error, Result};
use zip::ZipArchive;

const DOCUMENT_PATH: &str = "word/document.xml";
const HEADER_PREFIX: &str = "word/header";
const FOOTER_PREFIX: &str = "word/footer";

/// Extractor for DOCX (Office Open XML) word documents.
///
/// Each paragraph becomes one line. Headers come before the body and
/// footers after it.
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of the document stored at `path`.
    pub fn extract_path(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        self.extract(BufReader::new(file))
    }

    /// Extract the text of a document from a reader.
    pub fn extract<R: Read + Seek>(&self, reader: R) -> Result<String> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        let headers = numbered_parts(&names, HEADER_PREFIX);
        let footers = numbered_parts(&names, FOOTER_PREFIX);

        let mut lines = Vec::new();
        for header in &headers {
            lines.extend(self.part_lines(&mut archive, header)?);
        }
        lines.extend(self.part_lines(&mut archive, DOCUMENT_PATH)?);
        for footer in &footers {
            lines.extend(self.part_lines(&mut archive, footer)?);
        }

        debug!(
            "DOCX: {} lines from {} headers, body and {} footers",
            lines.len(),
            headers.len(),
            footers.len()
        );

        let text = normalize_line_endings(&join_lines(&lines));
        Ok(trim_blank_lines(&text).to_string())
    }

    fn part_lines<R: Read + Seek>(&self, archive: &mut ZipArchive<R>, path: &str) -> Result<Vec<String>> {
        let content = read_file_from_archive(archive, path)?;
        extract_paragraphs(&content)
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Archive entries named `<prefix><n>.xml`, ordered by `n`.
fn numbered_parts(names: &[String], prefix: &str) -> Vec<String> {
    let mut parts: Vec<(u32, &String)> = names
        .iter()
        .filter_map(|name| {
            let number = name.strip_prefix(prefix)?.strip_suffix(".xml")?;
            if !number.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            Some((number.parse().unwrap_or(0), name))
        })
        .collect();

    parts.sort();
    parts.into_iter().map(|(_, name)| name.clone()).collect()
}

/// Extract one line per `w:p` paragraph from a WordprocessingML part.
///
/// Inside runs, `w:t` contributes text, `w:tab` a tab and `w:br`/`w:cr` a
/// line break. `mc:Fallback` content is skipped since it duplicates the
/// preceding `mc:Choice`.
fn extract_paragraphs(xml_content: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml_content);

    let mut lines = Vec::new();
    let mut open_paragraphs: Vec<String> = Vec::new();
    let mut depth = 0usize;
    let mut run_depth = 0usize;
    let mut fallback_depth: Option<usize> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                if fallback_depth.is_some() {
                    continue;
                }
                let name = e.name();

                match local_name(name.as_ref()) {
                    b"Fallback" => fallback_depth = Some(depth),
                    b"p" => open_paragraphs.push(String::new()),
                    b"r" => run_depth += 1,
                    b"t" if run_depth > 0 => in_text = true,
                    b"tab" if run_depth > 0 => push_char(&mut open_paragraphs, '\t'),
                    b"br" | b"cr" if run_depth > 0 => push_char(&mut open_paragraphs, '\n'),
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                if fallback_depth.is_some() {
                    continue;
                }
                let name = e.name();

                match local_name(name.as_ref()) {
                    b"p" => lines.push(String::new()),
                    b"tab" if run_depth > 0 => push_char(&mut open_paragraphs, '\t'),
                    b"br" | b"cr" if run_depth > 0 => push_char(&mut open_paragraphs, '\n'),
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::XmlError(format!("Invalid text in document: {}", err)))?;
                if let Some(paragraph) = open_paragraphs.last_mut() {
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let local = local_name(name.as_ref());

                if let Some(skip_from) = fallback_depth {
                    if skip_from == depth && local == b"Fallback" {
                        fallback_depth = None;
                    }
                } else {
                    match local {
                        b"t" => in_text = false,
                        b"r" => run_depth = run_depth.saturating_sub(1),
                        b"p" => {
                            if let Some(paragraph) = open_paragraphs.pop() {
                                lines.push(paragraph);
                            }
                        }
                        _ => {}
                    }
                }

                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing document: {}", e)));
            }
            _ => {}
        }
    }

    Ok(lines)
}

fn push_char(open_paragraphs: &mut [String], c: char) {
    if let Some(paragraph) = open_paragraphs.last_mut() {
        paragraph.push(c);
    }
}
