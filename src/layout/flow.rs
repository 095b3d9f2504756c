//! Incremental page flow.

use crate::model::{ContentBlock, ImageBlock, PageGeometry, Point};

use super::{LayoutOptions, PlacementCommand, PlacementSink, TextOverflow};

/// Mutable layout state for one conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    /// Current vertical offset from the bottom edge
    pub y: f32,

    /// 1-indexed page number
    pub page: u32,
}

/// Places content blocks top to bottom, starting new pages as images overflow.
///
/// The engine never fails on its own; the only errors it returns are the
/// sink's.
#[derive(Debug, Clone)]
pub struct PageFlow {
    geometry: PageGeometry,
    options: LayoutOptions,
    cursor: PageCursor,
}

impl PageFlow {
    /// Create a page flow positioned at the first baseline of page 1.
    pub fn new(geometry: PageGeometry, options: LayoutOptions) -> Self {
        Self {
            geometry,
            options,
            cursor: PageCursor {
                y: options.top_offset,
                page: 1,
            },
        }
    }

    /// Current cursor.
    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Place one block, sending its commands to `sink`.
    pub fn place<S: PlacementSink>(
        &mut self,
        block: ContentBlock,
        sink: &mut S,
    ) -> Result<(), S::Error> {
        match block {
            ContentBlock::TextLine(text) => self.place_text(text, sink),
            ContentBlock::Image(image) => self.place_image(image, sink),
        }
    }

    fn place_text<S: PlacementSink>(&mut self, text: String, sink: &mut S) -> Result<(), S::Error> {
        let margin = self.options.margin;

        if self.options.text_overflow == TextOverflow::Paginate && self.cursor.y < margin {
            let top = self.geometry.height - margin - self.options.font_size;
            self.start_page(top, sink)?;
        }

        sink.accept(PlacementCommand::DrawText {
            at: Point::new(margin, self.cursor.y),
            text,
            font_size: self.options.font_size,
        })?;
        self.cursor.y -= self.options.leading;
        Ok(())
    }

    fn place_image<S: PlacementSink>(
        &mut self,
        image: ImageBlock,
        sink: &mut S,
    ) -> Result<(), S::Error> {
        if image.width == 0 || image.height == 0 {
            log::debug!(
                "Dropping {}x{} image with an empty dimension",
                image.width,
                image.height
            );
            return Ok(());
        }

        let margin = self.options.margin;
        let spacing = self.options.image_spacing;
        let (width, height) = self.fit(image.width as f32, image.height as f32);

        let mut bottom = self.cursor.y - height - spacing;
        if bottom < margin {
            self.start_page(self.geometry.height - margin, sink)?;
            bottom = self.cursor.y - height - spacing;
        }

        sink.accept(PlacementCommand::DrawImage {
            at: Point::new(margin, bottom),
            data: image.data,
            width,
            height,
        })?;
        self.cursor.y = bottom - spacing;
        Ok(())
    }

    /// Size an image is placed at: shrunk to fit inside the margins, never enlarged.
    pub fn fit(&self, width: f32, height: f32) -> (f32, f32) {
        let margin = self.options.margin;
        let scale = ((self.geometry.width - 2.0 * margin) / width)
            .min((self.geometry.height - 2.0 * margin) / height);
        if scale < 1.0 {
            (width * scale, height * scale)
        } else {
            (width, height)
        }
    }

    fn start_page<S: PlacementSink>(&mut self, top: f32, sink: &mut S) -> Result<(), S::Error> {
        sink.accept(PlacementCommand::NewPage)?;
        self.cursor = PageCursor {
            y: top,
            page: self.cursor.page + 1,
        };
        log::debug!("Started page {}", self.cursor.page);
        Ok(())
    }
}

/// Lay out a whole block sequence and collect the commands.
///
/// # Example
///
/// ```
/// use doc2pdf::layout::{layout, LayoutOptions};
/// use doc2pdf::model::{ContentBlock, PageGeometry};
///
/// let blocks = vec![ContentBlock::text("Hello"), ContentBlock::text("World")];
/// let commands = layout(blocks, PageGeometry::letter(), LayoutOptions::default());
/// assert_eq!(commands.len(), 2);
/// assert!(commands.iter().all(|c| !c.is_new_page()));
/// ```
pub fn layout<I>(blocks: I, geometry: PageGeometry, options: LayoutOptions) -> Vec<PlacementCommand>
where
    I: IntoIterator<Item = ContentBlock>,
{
    let mut flow = PageFlow::new(geometry, options);
    let mut commands = Vec::new();
    for block in blocks {
        match flow.place(block, &mut commands) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u32, height: u32) -> ContentBlock {
        ContentBlock::image(vec![0xFF], width, height)
    }

    #[test]
    fn test_text_lines_step_by_leading() {
        let blocks = (0..5).map(|i| ContentBlock::text(format!("line {}", i)));
        let commands = layout(blocks, PageGeometry::letter(), LayoutOptions::default());

        assert_eq!(commands.len(), 5);
        for (i, command) in commands.iter().enumerate() {
            match command {
                PlacementCommand::DrawText { at, font_size, .. } => {
                    assert_eq!(at.x, 25.0);
                    assert_eq!(at.y, 725.0 - 12.5 * i as f32);
                    assert_eq!(*font_size, 10.0);
                }
                other => panic!("unexpected command {:?}", other),
            }
        }
    }

    #[test]
    fn test_small_image_keeps_natural_size() {
        let commands = layout(
            vec![image(100, 50)],
            PageGeometry::letter(),
            LayoutOptions::default(),
        );
        assert_eq!(
            commands,
            vec![PlacementCommand::DrawImage {
                at: Point::new(25.0, 725.0 - 50.0 - 10.0),
                data: vec![0xFF],
                width: 100.0,
                height: 50.0,
            }]
        );
    }

    #[test]
    fn test_wide_image_is_scaled_down() {
        let flow = PageFlow::new(PageGeometry::letter(), LayoutOptions::default());
        let (w, h) = flow.fit(1124.0, 100.0);
        assert_eq!(w, 562.0);
        assert_eq!(h, 50.0);
    }

    #[test]
    fn test_cursor_moves_below_image() {
        let mut flow = PageFlow::new(PageGeometry::letter(), LayoutOptions::default());
        let mut sink = Vec::new();
        let _ = flow.place(image(10, 100), &mut sink);
        assert_eq!(flow.cursor().y, 725.0 - 100.0 - 10.0 - 10.0);
        assert_eq!(flow.cursor().page, 1);
    }

    #[test]
    fn test_overflowing_image_starts_page() {
        let mut flow = PageFlow::new(PageGeometry::letter(), LayoutOptions::default());
        let mut sink = Vec::new();
        let _ = flow.place(image(100, 600), &mut sink);
        let _ = flow.place(image(100, 600), &mut sink);

        assert_eq!(sink.len(), 3);
        assert!(sink[1].is_new_page());
        assert_eq!(
            sink[2].position(),
            Some(Point::new(25.0, 792.0 - 25.0 - 600.0 - 10.0))
        );
        assert_eq!(flow.cursor().page, 2);
    }

    #[test]
    fn test_zero_sized_image_is_dropped() {
        let commands = layout(
            vec![image(0, 10), image(10, 0)],
            PageGeometry::letter(),
            LayoutOptions::default(),
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn test_text_overflow_ignored_by_default() {
        let blocks = (0..100).map(|i| ContentBlock::text(i.to_string()));
        let commands = layout(blocks, PageGeometry::letter(), LayoutOptions::default());
        assert_eq!(commands.len(), 100);
        assert!(!commands.iter().any(|c| c.is_new_page()));
    }

    #[test]
    fn test_text_overflow_paginates_when_enabled() {
        let blocks = (0..100).map(|i| ContentBlock::text(i.to_string()));
        let options = LayoutOptions::default().paginate_text();
        let commands = layout(blocks, PageGeometry::letter(), options);

        let breaks: Vec<usize> = commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_new_page())
            .map(|(i, _)| i)
            .collect();
        // 725 down to 25 in 12.5 steps fits 57 lines
        assert_eq!(breaks, vec![57]);
        assert_eq!(commands[58].position(), Some(Point::new(25.0, 757.0)));
        for command in &commands {
            if let Some(at) = command.position() {
                assert!(at.y >= 25.0);
            }
        }
    }
}
