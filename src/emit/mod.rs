//! PDF emission.
//!
//! The [`PdfEmitter`] trait isolates the concrete PDF library from the
//! converter. Drawing happens inside a [`ContentScope`], which guarantees the
//! page content stream is closed on every exit path, and [`EmitterSink`]
//! feeds placement commands from the layout engine straight into a scope.

mod document;
mod scope;
mod xobject;

pub use document::{LopdfEmitter, PdfInfo};
pub use scope::{ContentScope, EmitterSink, SinkStats};
pub(crate) use xobject::embeds_verbatim;

use crate::error::Result;
use crate::model::{PageGeometry, Point};

/// One of the standard 14 fonts every PDF reader provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StandardFont {
    /// Helvetica, the default sans-serif face
    #[default]
    Helvetica,
    /// Times Roman
    TimesRoman,
    /// Courier, monospaced
    Courier,
}

impl StandardFont {
    /// PostScript name used as the font's `BaseFont`.
    pub fn base_font(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::TimesRoman => "Times-Roman",
            StandardFont::Courier => "Courier",
        }
    }

    /// Name of the font in a page's resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::TimesRoman => "F2",
            StandardFont::Courier => "F3",
        }
    }
}

impl std::str::FromStr for StandardFont {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "helvetica" => Ok(StandardFont::Helvetica),
            "times" | "times-roman" => Ok(StandardFont::TimesRoman),
            "courier" => Ok(StandardFont::Courier),
            other => Err(format!("unknown font '{}'", other)),
        }
    }
}

/// Abstract interface for writing PDF pages.
///
/// Drawing calls are only valid between `open_content` and `close_content`
/// on the most recently added page.
pub trait PdfEmitter {
    /// Append a page and return its geometry.
    fn add_page(&mut self) -> Result<PageGeometry>;

    /// Open a content stream on the last page.
    fn open_content(&mut self) -> Result<()>;

    /// Close the open content stream.
    fn close_content(&mut self) -> Result<()>;

    /// Draw one line of text with its baseline starting at `at`.
    fn draw_text(&mut self, at: Point, text: &str, font: StandardFont, size: f32) -> Result<()>;

    /// Draw an encoded picture with its lower-left corner at `at`.
    fn draw_image(&mut self, at: Point, data: &[u8], width: f32, height: f32) -> Result<()>;

    /// Number of pages added so far.
    fn page_count(&self) -> usize;

    /// Serialize the document.
    fn save(&mut self) -> Result<Vec<u8>>;
}
