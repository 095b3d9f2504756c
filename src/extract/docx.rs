//! DOCX (Office Open XML) content extraction.
//!
//! A DOCX file is a zip package. The parts read here:
//! - `word/document.xml`: body paragraphs and runs
//! - `word/_rels/document.xml.rels`: relationship ids to media targets
//! - `docProps/core.xml`: title and author

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::detect::ContainerKind;
use crate::error::{Error, Result};
use crate::model::{ContentBlock, DocumentInfo, ExtractedContent};

use super::image::push_picture;
use super::{ContentExtractor, ExtractOptions, TextGrouping};

const DOCUMENT_PART: &str = "word/document.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";
const CORE_PROPERTIES_PART: &str = "docProps/core.xml";

/// Upper bound on the up-front buffer for one part; larger parts grow as read.
const MAX_PREALLOCATION: u64 = 1 << 26;

/// Tab stops are not measured; a tab becomes a fixed run of spaces.
const TAB_EXPANSION: &str = "    ";

/// Extractor for zip-packaged Word documents.
#[derive(Debug, Clone, Default)]
pub struct PackageExtractor {
    _private: (),
}

impl PackageExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl ContentExtractor for PackageExtractor {
    fn kind(&self) -> ContainerKind {
        ContainerKind::ZipPackage
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn extract(&self, data: &[u8], options: &ExtractOptions) -> Result<ExtractedContent> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let document = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| Error::Extraction(format!("missing {}", DOCUMENT_PART)))?;
        let relationships = match read_part(&mut archive, RELATIONSHIPS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let mut content = ExtractedContent::default();
        if let Some(xml) = read_part(&mut archive, CORE_PROPERTIES_PART)? {
            content.info = parse_core_properties(&xml)?;
        }

        let items = walk_body(&document)?;
        let mut pending = String::new();
        for item in items {
            match item {
                BodyItem::Run(run) => {
                    match options.text_grouping {
                        TextGrouping::Run => push_lines(&mut content, &run.text),
                        TextGrouping::Paragraph => pending.push_str(&run.text),
                    }
                    if run.pictures.is_empty() || !options.wants_images() {
                        continue;
                    }
                    push_lines(&mut content, &std::mem::take(&mut pending));
                    for rel_id in &run.pictures {
                        let Some(target) = relationships.get(rel_id) else {
                            log::warn!("Picture relationship {} not found", rel_id);
                            continue;
                        };
                        let path = resolve_target("word", target);
                        let bytes = read_binary_part(&mut archive, &path)?.ok_or_else(|| {
                            Error::Extraction(format!("missing picture part {}", path))
                        })?;
                        push_picture(&mut content, bytes, &path, options)?;
                    }
                }
                BodyItem::ParagraphEnd => {
                    push_lines(&mut content, &std::mem::take(&mut pending));
                }
            }
        }
        push_lines(&mut content, &pending);

        log::debug!(
            "DOCX yielded {} text lines and {} pictures",
            content.text_line_count(),
            content.image_count()
        );
        Ok(content)
    }
}

/// Text and picture references of one `w:r`.
#[derive(Debug, Default, PartialEq)]
struct RunContent {
    text: String,
    pictures: Vec<String>,
}

#[derive(Debug, PartialEq)]
enum BodyItem {
    Run(RunContent),
    ParagraphEnd,
}

/// Split on explicit breaks; an empty string yields nothing.
fn push_lines(content: &mut ExtractedContent, text: &str) {
    if text.is_empty() {
        return;
    }
    for line in text.split('\n') {
        content.blocks.push(ContentBlock::text(line));
    }
}

/// Walk `word/document.xml` in document order.
///
/// Runs nested inside drawings (text boxes, shapes) are not body text, but a
/// drawing's picture references belong to the run that holds it. Of an
/// `mc:AlternateContent` only the `mc:Choice` branch is read.
fn walk_body(xml: &str) -> Result<Vec<BodyItem>> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    let mut run: Option<RunContent> = None;
    let mut drawing_depth = 0usize;
    let mut fallback_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader.read_event()?;
        if fallback_depth > 0 {
            match &event {
                Event::Start(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth += 1,
                Event::End(e) if e.local_name().as_ref() == b"Fallback" => fallback_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Fallback" => fallback_depth += 1,
                b"drawing" | b"pict" | b"object" => drawing_depth += 1,
                b"r" if drawing_depth == 0 => run = Some(RunContent::default()),
                b"t" if drawing_depth == 0 && run.is_some() => in_text = true,
                b"blip" | b"imagedata" => collect_picture(&e, run.as_mut()),
                _ => {}
            },
            Event::Empty(e) => {
                let name = e.local_name();
                match (name.as_ref(), run.as_mut()) {
                    (b"blip" | b"imagedata", current) => collect_picture(&e, current),
                    (b"tab", Some(current)) if drawing_depth == 0 => {
                        current.text.push_str(TAB_EXPANSION)
                    }
                    (b"br" | b"cr", Some(current)) if drawing_depth == 0 => {
                        current.text.push('\n')
                    }
                    (b"noBreakHyphen", Some(current)) if drawing_depth == 0 => {
                        current.text.push('-')
                    }
                    (b"p", _) if drawing_depth == 0 => items.push(BodyItem::ParagraphEnd),
                    _ => {}
                }
            }
            Event::Text(t) if in_text => {
                if let Some(current) = run.as_mut() {
                    current.text.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"drawing" | b"pict" | b"object" => {
                    drawing_depth = drawing_depth.saturating_sub(1)
                }
                b"r" if drawing_depth == 0 => {
                    if let Some(done) = run.take() {
                        items.push(BodyItem::Run(done));
                    }
                }
                b"p" if drawing_depth == 0 => items.push(BodyItem::ParagraphEnd),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

fn collect_picture(e: &BytesStart, run: Option<&mut RunContent>) {
    let Some(run) = run else {
        return;
    };
    let id = match e.local_name().as_ref() {
        b"blip" => get_attr(e, b"r:embed"),
        _ => get_attr(e, b"r:id"),
    };
    if let Some(id) = id {
        run.pictures.push(id);
    }
}

/// Extract an attribute value by its qualified key.
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Map relationship ids to targets, skipping external links.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut relationships = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let external = get_attr(&e, b"TargetMode").is_some_and(|m| m == "External");
                if let (Some(id), Some(target), false) =
                    (get_attr(&e, b"Id"), get_attr(&e, b"Target"), external)
                {
                    relationships.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(relationships)
}

/// Read `dc:title` and `dc:creator`.
fn parse_core_properties(xml: &str) -> Result<DocumentInfo> {
    let mut reader = Reader::from_str(xml);
    let mut info = DocumentInfo::default();
    let mut field: Option<&'static str> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                field = match e.local_name().as_ref() {
                    b"title" => Some("title"),
                    b"creator" => Some("creator"),
                    _ => None,
                }
            }
            Event::Text(t) => {
                let value = t.unescape()?.trim().to_string();
                match field {
                    Some("title") if !value.is_empty() => info.title = Some(value),
                    Some("creator") if !value.is_empty() => info.author = Some(value),
                    _ => {}
                }
            }
            Event::End(_) => field = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(info)
}

/// Resolve a relationship target against the source part's directory.
fn resolve_target(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("{}/{}", base_dir, target),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
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

fn read_binary_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<Vec<u8>>> {
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::with_capacity(preallocation(file.size()));
    file.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

/// Buffer size to reserve for a part whose header claims `declared` bytes.
fn preallocation(declared: u64) -> usize {
    declared.min(MAX_PREALLOCATION) as usize
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    match read_binary_part(archive, name)? {
        Some(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| Error::Extraction(format!("{} is not UTF-8: {}", name, e))),
        None => Ok(None),
    }
}
