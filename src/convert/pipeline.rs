//! The conversion pipeline.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::detect::{self, ContainerKind};
use crate::emit::{ContentScope, EmitterSink, LopdfEmitter, PdfEmitter, PdfInfo, SinkStats};
use crate::error::Result;
use crate::extract::{self, extractor_for};
use crate::layout::{PageFlow, PlacementCommand};
use crate::model::{ContentBlock, ExtractedContent};

use super::{ConvertOptions, ConvertResult, ConvertStats};

/// Convert an in-memory DOC or DOCX to PDF.
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<ConvertResult> {
    options.layout.validate(&options.geometry)?;
    let kind = detect::classify_bytes(data)?;
    convert_classified(kind, data, options)
}

/// Convert a DOC or DOCX read from `reader`.
///
/// The container is classified from the stream before it is read in full, so
/// unsupported input fails without buffering it.
pub fn convert_reader<R: Read + Seek>(mut reader: R, options: &ConvertOptions) -> Result<ConvertResult> {
    options.layout.validate(&options.geometry)?;
    let kind = detect::classify(&mut reader)?;
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    convert_classified(kind, &data, options)
}

/// Convert a DOC or DOCX file.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> Result<ConvertResult> {
    let path = path.as_ref();
    log::info!("Converting {}", path.display());
    let file = File::open(path)?;
    convert_reader(BufReader::new(file), options)
}

/// Extract and lay out a document without emitting a PDF.
pub fn plan_bytes(
    data: &[u8],
    options: &ConvertOptions,
) -> Result<(ContainerKind, Vec<PlacementCommand>)> {
    options.layout.validate(&options.geometry)?;
    let (kind, content) = extract::extract(data, &options.extract)?;
    let commands = crate::layout::layout(content.blocks, options.geometry, options.layout);
    Ok((kind, commands))
}

/// Lay out `blocks` onto a fresh first page of `emitter`.
///
/// Commands are drawn as the flow produces them. The content stream is closed
/// on every path out of this function.
pub fn render_blocks<E, I>(emitter: &mut E, blocks: I, options: &ConvertOptions) -> Result<SinkStats>
where
    E: PdfEmitter + ?Sized,
    I: IntoIterator<Item = ContentBlock>,
{
    emitter.add_page()?;
    let scope = ContentScope::open(emitter)?;
    let mut sink = EmitterSink::new(scope, options.font);
    let mut flow = PageFlow::new(options.geometry, options.layout);
    for block in blocks {
        flow.place(block, &mut sink)?;
    }
    sink.finish()
}

fn convert_classified(
    kind: ContainerKind,
    data: &[u8],
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    let extractor = extractor_for(kind);
    log::debug!("Detected {}, using {} extractor", kind, extractor.name());
    let ExtractedContent {
        blocks,
        info,
        skipped_images,
    } = extractor.extract(data, &options.extract)?;

    let pdf_info = PdfInfo {
        title: info.title.clone().filter(|_| options.metadata),
        author: info.author.clone().filter(|_| options.metadata),
        creation_date: options.creation_date,
    };
    let mut emitter = LopdfEmitter::new(options.geometry).with_info(pdf_info);
    let drawn = render_blocks(&mut emitter, blocks, options)?;
    let pdf = emitter.save()?;

    let stats = ConvertStats {
        text_lines: drawn.text_lines,
        images: drawn.images,
        images_skipped: skipped_images,
        pages: emitter.page_count(),
        replaced_chars: emitter.replaced_chars(),
    };
    log::info!(
        "Converted {} into {} pages ({} lines, {} images)",
        kind,
        stats.pages,
        stats.text_lines,
        stats.images
    );

    Ok(ConvertResult {
        pdf,
        kind,
        info,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::layout::LayoutOptions;
    use crate::model::PageGeometry;
    use std::io::Cursor;

    #[test]
    fn test_render_blocks_counts_pages() {
        let png = {
            let mut out = Cursor::new(Vec::new());
            image::DynamicImage::ImageRgb8(image::RgbImage::new(100, 700))
                .write_to(&mut out, image::ImageFormat::Png)
                .unwrap();
            out.into_inner()
        };
        let blocks = vec![
            ContentBlock::text("first"),
            ContentBlock::image(png.clone(), 100, 700),
            ContentBlock::image(png, 100, 700),
        ];

        let mut emitter = LopdfEmitter::new(PageGeometry::letter());
        let stats = render_blocks(&mut emitter, blocks, &ConvertOptions::default()).unwrap();
        assert_eq!(stats.text_lines, 1);
        assert_eq!(stats.images, 2);
        assert_eq!(stats.page_breaks, 2);
        assert_eq!(emitter.page_count(), 3);
    }

    #[test]
    fn test_render_no_blocks_gives_one_page() {
        let mut emitter = LopdfEmitter::new(PageGeometry::letter());
        let stats =
            render_blocks(&mut emitter, Vec::new(), &ConvertOptions::default()).unwrap();
        assert_eq!(stats, SinkStats::default());
        assert_eq!(emitter.page_count(), 1);
        assert!(emitter.save().is_ok());
    }

    #[test]
    fn test_render_failure_closes_content() {
        let mut emitter = LopdfEmitter::new(PageGeometry::letter());
        let blocks = vec![ContentBlock::image(b"not a picture".to_vec(), 10, 10)];
        let result = render_blocks(&mut emitter, blocks, &ConvertOptions::default());
        assert!(matches!(result, Err(Error::Image(_))));
        // The scope released the stream, so the page can be closed out.
        assert!(emitter.save().is_ok());
    }

    #[test]
    fn test_invalid_layout_rejected_before_reading() {
        let options = ConvertOptions::new().with_layout(LayoutOptions::default().with_leading(0.0));
        let result = convert_bytes(b"not a document", &options);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_reader_rejects_short_input() {
        let result = convert_reader(Cursor::new(b"PK".to_vec()), &ConvertOptions::default());
        assert!(matches!(result, Err(Error::InsufficientData { available: 2 })));
    }
}
