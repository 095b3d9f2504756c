//! Document conversion: sniff, extract, lay out, emit.
//!
//! # Example
//!
//! ```no_run
//! use doc2pdf::convert::{convert_file, ConvertOptions};
//!
//! fn main() -> doc2pdf::Result<()> {
//!     let options = ConvertOptions::new().lenient();
//!     let result = convert_file("report.docx", &options)?;
//!     std::fs::write("report.pdf", &result.pdf)?;
//!     println!("{} pages", result.stats.pages);
//!     Ok(())
//! }
//! ```

mod pipeline;

pub use pipeline::{convert_bytes, convert_file, convert_reader, plan_bytes, render_blocks};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::detect::ContainerKind;
use crate::emit::StandardFont;
use crate::extract::{ErrorMode, ExtractOptions};
use crate::layout::LayoutOptions;
use crate::model::{DocumentInfo, PageGeometry};

/// Options for one conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Size of every output page
    pub geometry: PageGeometry,

    /// Page flow settings
    pub layout: LayoutOptions,

    /// Extraction settings
    pub extract: ExtractOptions,

    /// Font used for all text
    pub font: StandardFont,

    /// Copy the document's title and author into the PDF
    pub metadata: bool,

    /// CreationDate written to the PDF; omitted when `None`
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            layout: LayoutOptions::default(),
            extract: ExtractOptions::default(),
            font: StandardFont::default(),
            metadata: true,
            creation_date: None,
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set extraction options.
    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Set the text font.
    pub fn with_font(mut self, font: StandardFont) -> Self {
        self.font = font;
        self
    }

    /// Skip undecodable pictures instead of failing.
    pub fn lenient(mut self) -> Self {
        self.extract = self.extract.with_error_mode(ErrorMode::Lenient);
        self
    }

    /// Convert text only.
    pub fn text_only(mut self) -> Self {
        self.extract = self.extract.text_only();
        self
    }

    /// Leave title and author out of the PDF.
    pub fn without_metadata(mut self) -> Self {
        self.metadata = false;
        self
    }

    /// Stamp the PDF with a creation date.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }
}

/// Conversion statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConvertStats {
    /// Text lines drawn
    pub text_lines: usize,

    /// Images drawn
    pub images: usize,

    /// Pictures skipped in lenient mode
    pub images_skipped: usize,

    /// Pages in the output
    pub pages: usize,

    /// Characters replaced because the font could not show them
    pub replaced_chars: usize,
}

/// Result of a conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Serialized PDF
    pub pdf: Vec<u8>,

    /// Detected input container
    pub kind: ContainerKind,

    /// Metadata found in the input
    pub info: DocumentInfo,

    /// Conversion statistics
    pub stats: ConvertStats,
}

impl ConvertResult {
    /// Size of the PDF in bytes.
    pub fn pdf_len(&self) -> usize {
        self.pdf.len()
    }
}
