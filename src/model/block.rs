//! Content blocks produced by the extractors.

use serde::{Deserialize, Serialize};

/// One unit of document content, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// A single line of text, placed verbatim
    TextLine(String),
    /// An embedded raster picture
    Image(ImageBlock),
}

impl ContentBlock {
    /// Create a text line block.
    pub fn text(line: impl Into<String>) -> Self {
        ContentBlock::TextLine(line.into())
    }

    /// Create an image block.
    pub fn image(data: Vec<u8>, width: u32, height: u32) -> Self {
        ContentBlock::Image(ImageBlock::new(data, width, height))
    }

    /// Check if this is a text line.
    pub fn is_text(&self) -> bool {
        matches!(self, ContentBlock::TextLine(_))
    }

    /// Check if this is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, ContentBlock::Image(_))
    }
}

/// Encoded picture bytes plus their natural size in pixels.
#[derive(Clone, PartialEq)]
pub struct ImageBlock {
    /// Encoded image file (PNG, JPEG, ...)
    pub data: Vec<u8>,

    /// Natural width in pixels
    pub width: u32,

    /// Natural height in pixels
    pub height: u32,
}

impl ImageBlock {
    /// Create a new image block.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }
}

impl std::fmt::Debug for ImageBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBlock")
            .field("bytes", &self.data.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Descriptive metadata carried over into the PDF Info dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,
}

/// Everything an extractor pulls out of a document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    /// Content blocks in document order
    pub blocks: Vec<ContentBlock>,

    /// Document metadata
    pub info: DocumentInfo,

    /// Pictures dropped because they could not be decoded (lenient mode)
    pub skipped_images: usize,
}

impl ExtractedContent {
    /// Number of text lines.
    pub fn text_line_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_text()).count()
    }

    /// Number of images.
    pub fn image_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_image()).count()
    }

    /// Check if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
