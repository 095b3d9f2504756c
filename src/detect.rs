//! Container format detection.
//!
//! Word documents come in two envelopes: the legacy OLE2 compound file used by
//! Word 97-2003 (`.doc`) and the zip-based OPC package used since Word 2007
//! (`.docx`). Both are recognized by their leading bytes.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// OLE2 compound file signature (`D0 CF 11 E0 A1 B1 1A E1`).
pub const LEGACY_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Zip local file header signature (`PK\x03\x04`).
pub const ZIP_SIGNATURE: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Number of bytes inspected when classifying.
pub const HEADER_LEN: usize = 8;

/// Outer envelope of a Word document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Word 97-2003 binary document inside an OLE2 compound file
    LegacyBinary,
    /// Office Open XML document inside a zip package
    ZipPackage,
}

impl ContainerKind {
    /// Conventional file extension, lowercase without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ContainerKind::LegacyBinary => "doc",
            ContainerKind::ZipPackage => "docx",
        }
    }

    /// Signature that identifies this container.
    pub fn signature(&self) -> &'static [u8] {
        match self {
            ContainerKind::LegacyBinary => &LEGACY_SIGNATURE,
            ContainerKind::ZipPackage => &ZIP_SIGNATURE,
        }
    }

    /// Human-readable name of the envelope.
    pub fn description(&self) -> &'static str {
        match self {
            ContainerKind::LegacyBinary => "OLE2 compound file",
            ContainerKind::ZipPackage => "zip package",
        }
    }
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerKind::LegacyBinary => write!(f, "DOC"),
            ContainerKind::ZipPackage => write!(f, "DOCX"),
        }
    }
}

/// Classify a seekable stream without moving its read position.
///
/// The header is read and the stream is then sought back to where it was,
/// on success and on failure alike, so extraction sees the full original
/// stream.
///
/// # Example
/// ```no_run
/// use doc2pdf::detect::{classify, ContainerKind};
/// use std::fs::File;
///
/// let mut file = File::open("report.docx").unwrap();
/// assert_eq!(classify(&mut file).unwrap(), ContainerKind::ZipPackage);
/// ```
pub fn classify<R: Read + Seek>(reader: &mut R) -> Result<ContainerKind> {
    let start = reader.stream_position()?;
    let header = read_header(reader);
    reader.seek(SeekFrom::Start(start))?;
    let (header, available) = header?;
    classify_bytes(&header[..available])
}

/// Classify in-memory data by its first bytes.
///
/// # Returns
/// * `Err(Error::InsufficientData)` if fewer than 8 bytes are given
/// * `Err(Error::UnrecognizedFormat)` if no signature matches
pub fn classify_bytes(data: &[u8]) -> Result<ContainerKind> {
    if data.len() < HEADER_LEN {
        return Err(Error::InsufficientData {
            available: data.len(),
        });
    }

    let header = &data[..HEADER_LEN];
    [ContainerKind::LegacyBinary, ContainerKind::ZipPackage]
        .into_iter()
        .find(|kind| header.starts_with(kind.signature()))
        .ok_or(Error::UnrecognizedFormat)
}

/// Classify a file on disk.
pub fn classify_path<P: AsRef<Path>>(path: P) -> Result<ContainerKind> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    classify(&mut reader)
}

/// Check if bytes start with a supported container signature.
pub fn is_supported_bytes(data: &[u8]) -> bool {
    classify_bytes(data).is_ok()
}

/// Read up to `HEADER_LEN` bytes, retrying short reads until EOF.
fn read_header<R: Read>(reader: &mut R) -> Result<([u8; HEADER_LEN], usize)> {
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        match reader.read(&mut header[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok((header, filled))
}
