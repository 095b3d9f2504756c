//! Document model types shared by extraction, layout, and emission.
//!
//! Extractors reduce a Word document to an ordered list of [`ContentBlock`]s;
//! the layout engine turns those into placements on pages described by
//! [`PageGeometry`].

mod block;
mod geometry;

pub use block::{ContentBlock, DocumentInfo, ExtractedContent, ImageBlock};
pub use geometry::{PageGeometry, Point};
