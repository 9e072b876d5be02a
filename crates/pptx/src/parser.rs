//! PPTX file parser implementation.

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use txtify_core::ooxml::{local_name, read_file_from_archive};
use txtify_core::{Error, ExtractedSlide, Presentation, Result};
use zip::ZipArchive;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";
const SLIDE_RELATIONSHIP_SUFFIX: &str = "/relationships/slide";

/// Soft line break (`a:br`) inside a paragraph.
const LINE_BREAK: char = '\u{000B}';

/// Extractor for PPTX (Office Open XML) slide decks.
///
/// Every paragraph of every top-level text-bearing shape becomes one line,
/// slides in deck order, without separators between slides.
pub struct PptxExtractor;

impl PptxExtractor {
    /// Create a new PPTX extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of the deck stored at `path`.
    pub fn extract_path(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        self.extract(BufReader::new(file))
    }

    /// Extract the text of a deck from a reader.
    pub fn extract<R: Read + Seek>(&self, reader: R) -> Result<String> {
        Ok(self.parse(reader)?.to_text())
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Presentation> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;
        debug!("PPTX declares {} slides", slide_order.len());

        let mut presentation = Presentation::new();
        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Get the ordered list of slide part paths.
    ///
    /// Order comes from `p:sldIdLst` in presentation.xml; each entry's
    /// relationship id is resolved through presentation.xml.rels.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let slide_targets = parse_slide_relationships(&rels_content)?;

        let presentation_content = read_file_from_archive(archive, PRESENTATION_PATH)?;
        let slide_ids = parse_slide_id_list(&presentation_content)?;

        slide_ids
            .into_iter()
            .map(|id| {
                slide_targets.get(&id).cloned().ok_or_else(|| {
                    Error::CorruptedFile(format!("slide relationship '{}' has no target", id))
                })
            })
            .collect()
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<ExtractedSlide> {
        let content = read_file_from_archive(archive, slide_path)?;
        let mut slide = ExtractedSlide::new(slide_number);

        for paragraph in extract_slide_paragraphs(&content)? {
            slide.add_paragraph(paragraph);
        }

        debug!(
            "Slide {} ({}): {} paragraphs",
            slide_number,
            slide_path,
            slide.paragraphs.len()
        );

        Ok(slide)
    }
}

impl Default for PptxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Text collected from one top-level shape.
#[derive(Debug)]
struct ShapeText {
    /// Element depth of the shape's start tag.
    depth: usize,
    has_text_body: bool,
    in_text_body: bool,
    paragraphs: Vec<String>,
}

impl ShapeText {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            has_text_body: false,
            in_text_body: false,
            paragraphs: Vec::new(),
        }
    }
}

/// Extract paragraphs from slide XML.
///
/// Only `p:sp` elements that are direct children of the slide's shape tree
/// count. Shapes inside groups, pictures and graphic frames contribute
/// nothing.
fn extract_slide_paragraphs(xml_content: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml_content);

    let mut paragraphs = Vec::new();
    let mut depth = 0usize;
    let mut tree_depth: Option<usize> = None;
    let mut shape: Option<ShapeText> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = e.name();

                match local_name(name.as_ref()) {
                    b"spTree" if tree_depth.is_none() => tree_depth = Some(depth),
                    b"sp" if shape.is_none() && tree_depth.is_some_and(|d| depth == d + 1) => {
                        shape = Some(ShapeText::new(depth));
                    }
                    b"txBody" => {
                        if let Some(shape) = shape.as_mut() {
                            shape.has_text_body = true;
                            shape.in_text_body = true;
                        }
                    }
                    b"p" if shape.as_ref().is_some_and(|s| s.in_text_body) => {
                        paragraph = Some(String::new());
                    }
                    b"t" if paragraph.is_some() => in_text = true,
                    b"br" => {
                        if let Some(paragraph) = paragraph.as_mut() {
                            paragraph.push(LINE_BREAK);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();

                match local_name(name.as_ref()) {
                    b"p" => {
                        if let Some(shape) = shape.as_mut().filter(|s| s.in_text_body) {
                            shape.paragraphs.push(String::new());
                        }
                    }
                    b"br" => {
                        if let Some(paragraph) = paragraph.as_mut() {
                            paragraph.push(LINE_BREAK);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::XmlError(format!("Invalid text in slide: {}", err)))?;
                if let Some(paragraph) = paragraph.as_mut() {
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();

                match local_name(name.as_ref()) {
                    b"t" => in_text = false,
                    b"p" => {
                        if let (Some(text), Some(shape)) = (paragraph.take(), shape.as_mut()) {
                            shape.paragraphs.push(text);
                        }
                    }
                    b"txBody" => {
                        if let Some(shape) = shape.as_mut() {
                            shape.in_text_body = false;
                        }
                    }
                    b"sp" if shape.as_ref().is_some_and(|s| s.depth == depth) => {
                        if let Some(done) = shape.take() {
                            if done.has_text_body {
                                paragraphs.extend(done.paragraphs);
                            }
                        }
                    }
                    _ => {}
                }

                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Map slide relationship ids to archive paths.
fn parse_slide_relationships(rels_content: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(rels_content);
    let mut slides = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Type" => rel_type = value,
                        b"Target" => target = value,
                        b"Id" => id = value,
                        _ => {}
                    }
                }

                if rel_type.ends_with(SLIDE_RELATIONSHIP_SUFFIX) {
                    slides.insert(id, resolve_target("ppt", &target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(slides)
}

/// Relationship ids of `p:sldId` entries, in deck order.
fn parse_slide_id_list(presentation_content: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(presentation_content);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                if let Some(id) = relationship_id(e) {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// The namespaced `r:id` attribute, as opposed to the plain numeric `id`.
fn relationship_id(element: &BytesStart<'_>) -> Option<String> {
    element.attributes().flatten().find_map(|attr| {
        let key = attr.key.as_ref();
        if key.contains(&b':') && local_name(key) == b"id" {
            Some(String::from_utf8_lossy(&attr.value).to_string())
        } else {
            None
        }
    })
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const PRESENTATION_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>
  <p:sldIdLst>
    <p:sldId id="256" r:id="rId3"/>
    <p:sldId id="257" r:id="rId2"/>
  </p:sldIdLst>
</p:presentation>"#;

    const PRESENTATION_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/>
</Relationships>"#;

    fn slide_xml(shapes: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree><p:nvGrpSpPr/><p:grpSpPr/>{}</p:spTree></p:cSld>
</p:sld>"#,
            shapes
        )
    }

    fn build_archive(parts: &[(&str, String)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        for (name, content) in parts {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn deck(slide1: &str, slide2: &str) -> Vec<u8> {
        build_archive(&[
            ("ppt/presentation.xml", PRESENTATION_XML.to_string()),
            ("ppt/_rels/presentation.xml.rels", PRESENTATION_RELS.to_string()),
            ("ppt/slides/slide1.xml", slide_xml(slide1)),
            ("ppt/slides/slide2.xml", slide_xml(slide2)),
        ])
    }

    #[test]
    fn test_slides_follow_deck_order() {
        // rId3 (slide2.xml) is listed first in sldIdLst.
        let bytes = deck(
            r#"<p:sp><p:txBody><a:p><a:r><a:t>Second</a:t></a:r></a:p></p:txBody></p:sp>"#,
            r#"<p:sp><p:txBody><a:p><a:r><a:t>First</a:t></a:r></a:p></p:txBody></p:sp>"#,
        );

        let text = PptxExtractor::new().extract(Cursor::new(bytes)).unwrap();
        assert_eq!(text, "First\nSecond");
    }

    #[test]
    fn test_paragraph_per_line_with_runs_and_empty_paragraphs() {
        let shapes = r#"
            <p:sp><p:txBody><a:bodyPr/>
              <a:p><a:r><a:t>Hello </a:t></a:r><a:r><a:t>world</a:t></a:r></a:p>
              <a:p><a:endParaRPr lang="en-US"/></a:p>
              <a:p/>
              <a:p><a:r><a:t>Fish &amp; chips</a:t></a:r></a:p>
            </p:txBody></p:sp>
            <p:sp><p:txBody><a:p><a:r><a:t>Up</a:t></a:r><a:br/><a:r><a:t>Down</a:t></a:r></a:p></p:txBody></p:sp>"#;
        // slide2.xml comes first in deck order.
        let bytes = deck("", shapes);

        let presentation = PptxExtractor::new().parse(Cursor::new(bytes)).unwrap();
        assert_eq!(presentation.slides.len(), 2);
        assert_eq!(presentation.slides[0].number, 1);
        assert!(presentation.slides[1].paragraphs.is_empty());
        assert_eq!(
            presentation.slides[0].paragraphs,
            vec!["Hello world", "", "", "Fish & chips", "Up\u{b}Down"]
        );
    }

    #[test]
    fn test_group_and_picture_shapes_are_skipped() {
        let shapes = r#"
            <p:grpSp><p:sp><p:txBody><a:p><a:r><a:t>Grouped</a:t></a:r></a:p></p:txBody></p:sp></p:grpSp>
            <p:pic><p:nvPicPr/></p:pic>
            <p:graphicFrame><a:graphic><a:graphicData><a:tbl><a:tr><a:tc><a:txBody><a:p><a:r><a:t>Cell</a:t></a:r></a:p></a:txBody></a:tc></a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>
            <p:sp><p:nvSpPr/></p:sp>
            <p:sp><p:txBody><a:p><a:fld type="slidenum"><a:t>7</a:t></a:fld></a:p></p:txBody></p:sp>"#;
        let bytes = deck(shapes, "");

        let text = PptxExtractor::new().extract(Cursor::new(bytes)).unwrap();
        assert_eq!(text, "7");
    }

    #[test]
    fn test_not_a_zip_is_an_error() {
        let err = PptxExtractor::new()
            .extract(Cursor::new(b"definitely not a zip".to_vec()))
            .unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }

    #[test]
    fn test_missing_presentation_part_is_an_error() {
        let bytes = build_archive(&[("docProps/app.xml", "<Properties/>".to_string())]);
        let err = PptxExtractor::new().extract(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }

    #[test]
    fn test_dangling_slide_id_is_corrupt() {
        let presentation = PRESENTATION_XML.replace("rId3", "rId9");
        let bytes = build_archive(&[
            ("ppt/presentation.xml", presentation),
            ("ppt/_rels/presentation.xml.rels", PRESENTATION_RELS.to_string()),
        ]);
        let err = PptxExtractor::new().extract(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::CorruptedFile(_)));
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("ppt", "/ppt/slides/slide3.xml"), "ppt/slides/slide3.xml");
        assert_eq!(resolve_target("ppt/slides", "../media/a.png"), "ppt/media/a.png");
    }
}
