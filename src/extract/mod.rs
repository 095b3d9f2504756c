//! Content extraction from Word documents.
//!
//! Each container kind has an extractor that turns raw bytes into an ordered
//! list of [`ContentBlock`](crate::model::ContentBlock)s. Extractors share the
//! [`ContentExtractor`] interface so the converter never sees the container
//! libraries directly.

mod doc;
mod docx;
mod image;
mod options;

pub use doc::LegacyExtractor;
pub use docx::PackageExtractor;
pub use image::probe_dimensions;
pub use options::{ErrorMode, ExtractMode, ExtractOptions, TextGrouping};

use crate::detect::{self, ContainerKind};
use crate::error::Result;
use crate::model::ExtractedContent;

/// Abstract interface for pulling content out of one container kind.
pub trait ContentExtractor: Send + Sync {
    /// The container kind this extractor reads.
    fn kind(&self) -> ContainerKind;

    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Extract text lines and pictures in document order.
    fn extract(&self, data: &[u8], options: &ExtractOptions) -> Result<ExtractedContent>;
}

/// Get the extractor for a container kind.
pub fn extractor_for(kind: ContainerKind) -> Box<dyn ContentExtractor> {
    match kind {
        ContainerKind::LegacyBinary => Box::new(LegacyExtractor::new()),
        ContainerKind::ZipPackage => Box::new(PackageExtractor::new()),
    }
}

/// Classify `data` and extract its content with the matching extractor.
pub fn extract(data: &[u8], options: &ExtractOptions) -> Result<(ContainerKind, ExtractedContent)> {
    let kind = detect::classify_bytes(data)?;
    let extractor = extractor_for(kind);
    log::debug!("Extracting with {} extractor", extractor.name());
    let content = extractor.extract(data, options)?;
    Ok((kind, content))
}
