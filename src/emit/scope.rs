//! Scoped content streams and the emitter-backed placement sink.

use crate::error::{Error, Result};
use crate::layout::{PlacementCommand, PlacementSink};
use crate::model::PageGeometry;

use super::{PdfEmitter, StandardFont};

/// An open content stream on an emitter's current page.
///
/// The stream is opened on construction and closed by [`close`](Self::close).
/// If the scope is dropped while still open (an early return through `?`),
/// the stream is closed in `Drop` and any failure is logged.
pub struct ContentScope<'a, E: PdfEmitter + ?Sized> {
    emitter: &'a mut E,
    open: bool,
}

impl<'a, E: PdfEmitter + ?Sized> ContentScope<'a, E> {
    /// Open a content stream on the emitter's last page.
    pub fn open(emitter: &'a mut E) -> Result<Self> {
        emitter.open_content()?;
        Ok(Self {
            emitter,
            open: true,
        })
    }

    /// The emitter, for drawing into the open stream.
    pub fn emitter(&mut self) -> &mut E {
        &mut *self.emitter
    }

    /// Close the current page's stream, add a page, and reopen on it.
    pub fn new_page(&mut self) -> Result<PageGeometry> {
        self.open = false;
        self.emitter.close_content()?;
        let geometry = self.emitter.add_page()?;
        self.emitter.open_content()?;
        self.open = true;
        Ok(geometry)
    }

    /// Close the stream, reporting any failure.
    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.emitter.close_content()
    }
}

impl<E: PdfEmitter + ?Sized> Drop for ContentScope<'_, E> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.emitter.close_content() {
                log::warn!("Failed to close content stream: {}", e);
            }
        }
    }
}

/// Counts of what an [`EmitterSink`] drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Text lines drawn
    pub text_lines: usize,

    /// Images drawn
    pub images: usize,

    /// Pages started after the first
    pub page_breaks: usize,
}

/// A [`PlacementSink`] that draws each command as it arrives.
pub struct EmitterSink<'a, E: PdfEmitter + ?Sized> {
    scope: ContentScope<'a, E>,
    font: StandardFont,
    stats: SinkStats,
}

impl<'a, E: PdfEmitter + ?Sized> EmitterSink<'a, E> {
    /// Wrap an open scope; text is drawn with `font`.
    pub fn new(scope: ContentScope<'a, E>, font: StandardFont) -> Self {
        Self {
            scope,
            font,
            stats: SinkStats::default(),
        }
    }

    /// Close the content stream and return the counts.
    pub fn finish(self) -> Result<SinkStats> {
        let stats = self.stats;
        self.scope.close()?;
        Ok(stats)
    }
}

impl<E: PdfEmitter + ?Sized> PlacementSink for EmitterSink<'_, E> {
    type Error = Error;

    fn accept(&mut self, command: PlacementCommand) -> Result<()> {
        match command {
            PlacementCommand::DrawText {
                at,
                text,
                font_size,
            } => {
                self.scope
                    .emitter()
                    .draw_text(at, &text, self.font, font_size)?;
                self.stats.text_lines += 1;
            }
            PlacementCommand::DrawImage {
                at,
                data,
                width,
                height,
            } => {
                self.scope.emitter().draw_image(at, &data, width, height)?;
                self.stats.images += 1;
            }
            PlacementCommand::NewPage => {
                self.scope.new_page()?;
                self.stats.page_breaks += 1;
            }
        }
        Ok(())
    }
}
