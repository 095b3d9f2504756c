//! # doc2pdf
//!
//! Convert Word documents (legacy `.doc` and zipped `.docx`) to PDF.
//!
//! The input's container is identified from its leading bytes, its text lines
//! and pictures are extracted in document order, and a page-flow engine places
//! them top to bottom, starting a new page whenever a picture would cross the
//! bottom margin.
//!
//! ## Quick Start
//!
//! ```no_run
//! use doc2pdf::convert_to_file;
//!
//! fn main() -> doc2pdf::Result<()> {
//!     let stats = convert_to_file("report.docx", "report.pdf")?;
//!     println!("{} pages", stats.pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Format sniffing**: DOC and DOCX recognized by signature, not extension
//! - **Page flow**: fixed leading for text, pictures scaled to fit the page
//! - **Pictures**: PNG, JPEG, GIF, BMP and TIFF; JPEGs embedded without re-encoding
//! - **Metadata**: title and author carried into the PDF Info dictionary

pub mod convert;
pub mod detect;
pub mod emit;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod layout;
pub mod model;

// Re-export commonly used types
pub use convert::{
    convert_bytes, convert_file, convert_reader, ConvertOptions, ConvertResult, ConvertStats,
};
pub use detect::{classify, classify_bytes, classify_path, is_supported_bytes, ContainerKind};
pub use emit::{LopdfEmitter, PdfEmitter, StandardFont};
pub use error::{Error, Result};
pub use extract::{ContentExtractor, ErrorMode, ExtractMode, ExtractOptions, TextGrouping};
pub use layout::{layout, LayoutOptions, PageFlow, PlacementCommand, PlacementSink, TextOverflow};
pub use model::{ContentBlock, DocumentInfo, PageGeometry, Point};

use chrono::{DateTime, Utc};
use std::io::{Read, Seek};
use std::path::Path;

/// Convert a document file with default options and write the PDF to `output`.
///
/// # Example
///
/// ```no_run
/// use doc2pdf::convert_to_file;
///
/// let stats = convert_to_file("legacy.doc", "legacy.pdf").unwrap();
/// println!("{} images", stats.images);
/// ```
pub fn convert_to_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<ConvertStats> {
    let result = convert_file(input, &ConvertOptions::default())?;
    std::fs::write(output, &result.pdf)?;
    Ok(result.stats)
}

/// Builder for converting documents.
///
/// # Example
///
/// ```no_run
/// use doc2pdf::Doc2Pdf;
///
/// let result = Doc2Pdf::new()
///     .a4()
///     .paginate_text()
///     .lenient()
///     .convert_file("report.docx")?;
/// std::fs::write("report.pdf", &result.pdf)?;
/// # Ok::<(), doc2pdf::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Doc2Pdf {
    options: ConvertOptions,
}

impl Doc2Pdf {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing options.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, geometry: PageGeometry) -> Self {
        self.options.geometry = geometry;
        self
    }

    /// Use A4 pages.
    pub fn a4(self) -> Self {
        self.with_page_size(PageGeometry::a4())
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.options.layout = layout;
        self
    }

    /// Start new pages when text reaches the bottom margin.
    pub fn paginate_text(mut self) -> Self {
        self.options.layout = self.options.layout.paginate_text();
        self
    }

    /// Skip undecodable pictures instead of failing.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Convert text only.
    pub fn text_only(mut self) -> Self {
        self.options = self.options.text_only();
        self
    }

    /// Join the runs of a DOCX paragraph into one line.
    pub fn group_paragraphs(mut self) -> Self {
        self.options.extract = self
            .options
            .extract
            .with_text_grouping(TextGrouping::Paragraph);
        self
    }

    /// Set the text font.
    pub fn with_font(mut self, font: StandardFont) -> Self {
        self.options.font = font;
        self
    }

    /// Stamp the PDF with a creation date.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.options.creation_date = Some(date);
        self
    }

    /// Leave title and author out of the PDF.
    pub fn without_metadata(mut self) -> Self {
        self.options.metadata = false;
        self
    }

    /// The options this builder will convert with.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a file.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        convert_file(path, &self.options)
    }

    /// Convert bytes.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConvertResult> {
        convert_bytes(data, &self.options)
    }

    /// Convert from a reader.
    pub fn convert_reader<R: Read + Seek>(&self, reader: R) -> Result<ConvertResult> {
        convert_reader(reader, &self.options)
    }
}
