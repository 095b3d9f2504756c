//! Word 97-2003 (.doc) binary content extraction.
//!
//! The document lives in an OLE2 compound file. Text is located through the
//! File Information Block (FIB) at the start of the `WordDocument` stream,
//! which points at the piece table (CLX) in the `0Table` or `1Table` stream.
//! Each piece maps a character range to bytes of the `WordDocument` stream,
//! stored either as cp1252 ("compressed") or UTF-16LE.
//!
//! Pictures are recovered from the `Data` stream by scanning for complete
//! PNG and JPEG payloads.

use std::io::{Cursor, Read, Seek};

use crate::detect::ContainerKind;
use crate::encoding;
use crate::error::{Error, Result};
use crate::model::{ContentBlock, ExtractedContent};

use super::image::push_picture;
use super::{ContentExtractor, ExtractOptions};

const WORD_STREAM: &str = "WordDocument";
const DATA_STREAM: &str = "Data";

/// `wIdent` of every Word 97+ FIB.
const WORD_IDENT: u16 = 0xA5EC;
const FLAG_ENCRYPTED: u16 = 0x0100;
const FLAG_WHICH_TABLE: u16 = 0x0200;

/// Index of the fcClx/lcbClx pair in FibRgFcLcb97.
const CLX_PAIR_INDEX: usize = 33;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SOI: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Extractor for legacy binary Word documents.
#[derive(Debug, Clone, Default)]
pub struct LegacyExtractor {
    _private: (),
}

impl LegacyExtractor {
    /// Create a new DOC extractor.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl ContentExtractor for LegacyExtractor {
    fn kind(&self) -> ContainerKind {
        ContainerKind::LegacyBinary
    }

    fn name(&self) -> &str {
        "doc"
    }

    fn extract(&self, data: &[u8], options: &ExtractOptions) -> Result<ExtractedContent> {
        let mut file = cfb::CompoundFile::open(Cursor::new(data))
            .map_err(|e| Error::Extraction(format!("compound file: {}", e)))?;

        let word = read_stream(&mut file, WORD_STREAM)?
            .ok_or_else(|| Error::Extraction(format!("missing {} stream", WORD_STREAM)))?;
        let fib = Fib::parse(&word)?;
        let table_name = fib.table_stream();
        let table = read_stream(&mut file, table_name)?
            .ok_or_else(|| Error::Extraction(format!("missing {} stream", table_name)))?;

        let pieces = parse_piece_table(&table, fib.fc_clx, fib.lcb_clx)?;
        let text = decode_text(&word, &pieces, fib.ccp_text)?;

        let mut content = ExtractedContent::default();
        content
            .blocks
            .extend(split_lines(&clean_text(&text)).into_iter().map(ContentBlock::text));

        if options.wants_images() {
            if let Some(stream) = read_stream(&mut file, DATA_STREAM)? {
                for (index, (offset, picture)) in scan_pictures(&stream).into_iter().enumerate() {
                    let origin = format!("picture {} at Data+{:#x}", index + 1, offset);
                    push_picture(&mut content, picture.to_vec(), &origin, options)?;
                }
            }
        }

        log::debug!(
            "DOC yielded {} text lines and {} pictures",
            content.text_line_count(),
            content.image_count()
        );
        Ok(content)
    }
}

/// The FIB fields needed to reach the main document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fib {
    which_table: bool,
    ccp_text: u32,
    fc_clx: u32,
    lcb_clx: u32,
}

impl Fib {
    fn parse(word: &[u8]) -> Result<Self> {
        if read_u16(word, 0)? != WORD_IDENT {
            return Err(Error::Extraction(
                "WordDocument stream has no Word 97+ FIB".into(),
            ));
        }
        let flags = read_u16(word, 0x0A)?;
        if flags & FLAG_ENCRYPTED != 0 {
            return Err(Error::Encrypted);
        }

        // FibBase is 32 bytes; csw/rgW, cslw/rgLw and cbRgFcLcb/rgFcLcb follow.
        let mut pos = 32;
        let csw = read_u16(word, pos)? as usize;
        pos += 2 + csw * 2;
        let cslw = read_u16(word, pos)? as usize;
        pos += 2;
        if cslw < 4 {
            return Err(Error::Extraction("FibRgLw97 is truncated".into()));
        }
        let ccp_text = read_u32(word, pos + 12)?;
        pos += cslw * 4;
        let cb_rg_fc_lcb = read_u16(word, pos)? as usize;
        pos += 2;
        if cb_rg_fc_lcb <= CLX_PAIR_INDEX {
            return Err(Error::Extraction("FibRgFcLcb97 is truncated".into()));
        }
        let clx = pos + CLX_PAIR_INDEX * 8;

        Ok(Self {
            which_table: flags & FLAG_WHICH_TABLE != 0,
            ccp_text,
            fc_clx: read_u32(word, clx)?,
            lcb_clx: read_u32(word, clx + 4)?,
        })
    }

    fn table_stream(&self) -> &'static str {
        if self.which_table {
            "1Table"
        } else {
            "0Table"
        }
    }
}

/// One entry of the piece table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Piece {
    cp_start: u32,
    cp_end: u32,
    offset: usize,
    compressed: bool,
}

fn parse_piece_table(table: &[u8], fc_clx: u32, lcb_clx: u32) -> Result<Vec<Piece>> {
    let start = fc_clx as usize;
    let clx = table
        .get(start..start.saturating_add(lcb_clx as usize))
        .ok_or_else(|| Error::Extraction("CLX lies outside the table stream".into()))?;

    // Skip Prc entries (property modifiers) ahead of the Pcdt.
    let mut pos = 0;
    while clx.get(pos) == Some(&0x01) {
        pos += 3 + read_u16(clx, pos + 1)? as usize;
    }
    if clx.get(pos) != Some(&0x02) {
        return Err(Error::Extraction("CLX has no piece table".into()));
    }

    let lcb = read_u32(clx, pos + 1)? as usize;
    let plc = clx
        .get(pos + 5..pos + 5 + lcb)
        .ok_or_else(|| Error::Extraction("piece table is truncated".into()))?;
    if lcb < 4 || (lcb - 4) % 12 != 0 {
        return Err(Error::Extraction(format!("bad piece table size {}", lcb)));
    }

    let count = (lcb - 4) / 12;
    let descriptors = (count + 1) * 4;
    let mut pieces = Vec::with_capacity(count);
    for i in 0..count {
        let fc = read_u32(plc, descriptors + i * 8 + 2)?;
        let compressed = fc & 0x4000_0000 != 0;
        let fc = (fc & 0x3FFF_FFFF) as usize;
        pieces.push(Piece {
            cp_start: read_u32(plc, i * 4)?,
            cp_end: read_u32(plc, (i + 1) * 4)?,
            offset: if compressed { fc / 2 } else { fc },
            compressed,
        });
    }
    Ok(pieces)
}

/// Concatenate the pieces of the main document story.
fn decode_text(word: &[u8], pieces: &[Piece], ccp_text: u32) -> Result<String> {
    let mut text = String::new();
    for piece in pieces {
        if piece.cp_start >= ccp_text {
            break;
        }
        let chars = (piece.cp_end.min(ccp_text).saturating_sub(piece.cp_start)) as usize;
        let width = if piece.compressed { 1 } else { 2 };
        let bytes = word
            .get(piece.offset..piece.offset + chars * width)
            .ok_or_else(|| Error::Extraction("text piece lies outside the stream".into()))?;

        if piece.compressed {
            text.push_str(&encoding::decode(bytes));
        } else {
            text.push_str(&encoding::decode_utf16le(bytes));
        }
    }
    Ok(text)
}

/// Turn Word's in-band control characters into plain text with `\n` line ends.
///
/// Field instructions (between 0x13 and 0x14) are dropped and field results
/// (between 0x14 and 0x15) kept.
fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    // One entry per open field: true once its result part has started.
    let mut fields: Vec<bool> = Vec::new();

    for ch in raw.chars() {
        match ch {
            '\u{13}' => fields.push(false),
            '\u{14}' => {
                if let Some(in_result) = fields.last_mut() {
                    *in_result = true;
                }
            }
            '\u{15}' => {
                fields.pop();
            }
            _ if fields.iter().any(|in_result| !in_result) => {}
            '\r' | '\n' | '\u{0B}' | '\u{0C}' | '\u{07}' => out.push('\n'),
            '\t' => out.push_str("    "),
            '\u{1E}' => out.push('-'),
            // Optional hyphens (0x1F) and remaining marks carry no text.
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Split into lines, dropping trailing empty ones.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Find complete PNG and JPEG payloads, with their offsets.
fn scan_pictures(data: &[u8]) -> Vec<(usize, &[u8])> {
    let mut pictures = Vec::new();
    let mut pos = 0;
    while pos < data.len() {
        let rest = &data[pos..];
        let found = if rest.starts_with(PNG_SIGNATURE) {
            png_length(rest)
        } else if rest.starts_with(JPEG_SOI) {
            jpeg_length(rest)
        } else {
            None
        };
        match found {
            Some(len) => {
                pictures.push((pos, &rest[..len]));
                pos += len;
            }
            None => pos += 1,
        }
    }
    pictures
}

/// Length of a PNG up to and including its IEND chunk.
fn png_length(data: &[u8]) -> Option<usize> {
    let mut pos = PNG_SIGNATURE.len();
    loop {
        let len = u32::from_be_bytes(data.get(pos..pos + 4)?.try_into().ok()?) as usize;
        let kind = data.get(pos + 4..pos + 8)?;
        let next = pos.checked_add(12)?.checked_add(len)?;
        if next > data.len() {
            return None;
        }
        if kind == b"IEND" {
            return Some(next);
        }
        pos = next;
    }
}

/// Length of a JPEG up to and including its EOI marker.
fn jpeg_length(data: &[u8]) -> Option<usize> {
    let mut pos = 2;
    loop {
        if *data.get(pos)? != 0xFF {
            return None;
        }
        while *data.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = data[pos];
        pos += 1;
        match marker {
            0xD9 => return Some(pos),
            0x01 | 0xD0..=0xD7 => continue,
            0x00 => return None,
            _ => {}
        }

        let len = u16::from_be_bytes(data.get(pos..pos + 2)?.try_into().ok()?) as usize;
        if len < 2 || pos + len > data.len() {
            return None;
        }
        pos += len;

        if marker == 0xDA {
            // Entropy-coded data ends at the first marker that is not a
            // stuffed zero or a restart.
            loop {
                if *data.get(pos)? == 0xFF {
                    let next = *data.get(pos + 1)?;
                    if next != 0x00 && !(0xD0..=0xD7).contains(&next) {
                        break;
                    }
                    pos += 2;
                } else {
                    pos += 1;
                }
            }
        }
    }
}

fn read_stream<F: Read + Seek>(file: &mut cfb::CompoundFile<F>, name: &str) -> Result<Option<Vec<u8>>> {
    if !file.is_stream(name) {
        return Ok(None);
    }
    let mut stream = file
        .open_stream(name)
        .map_err(|e| Error::Extraction(format!("{} stream: {}", name, e)))?;
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| Error::Extraction(format!("unexpected end of data at {:#x}", offset)))
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| Error::Extraction(format!("unexpected end of data at {:#x}", offset)))
}
