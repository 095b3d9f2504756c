//! Picture probing shared by both extractors.

use image::ImageReader;
use std::io::Cursor;

use crate::emit::embeds_verbatim;
use crate::error::{Error, Result};
use crate::model::{ContentBlock, ExtractedContent};

use super::{ErrorMode, ExtractOptions};

/// Read the pixel size of an encoded picture from its header.
pub fn probe_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(Error::Image("unrecognized picture format".into()));
    }
    Ok(reader.into_dimensions()?)
}

/// Size of a picture the emitter will be able to embed.
///
/// Pictures that are not copied verbatim into the PDF are decoded in full, so
/// a valid header over a corrupt body is caught here.
fn check_picture(data: &[u8]) -> Result<(u32, u32)> {
    let dimensions = probe_dimensions(data)?;
    if !embeds_verbatim(data) {
        image::load_from_memory(data)?;
    }
    Ok(dimensions)
}

/// Append a picture to `content`, honouring the error mode when it cannot be read.
pub(crate) fn push_picture(
    content: &mut ExtractedContent,
    data: Vec<u8>,
    origin: &str,
    options: &ExtractOptions,
) -> Result<()> {
    match check_picture(&data) {
        Ok((width, height)) => {
            log::debug!("Picture {} is {}x{}", origin, width, height);
            content.blocks.push(ContentBlock::image(data, width, height));
            Ok(())
        }
        Err(err) => {
            let reason = match err {
                Error::Image(msg) => msg,
                other => other.to_string(),
            };
            match options.error_mode {
                ErrorMode::Strict => Err(Error::Image(format!("{}: {}", origin, reason))),
                ErrorMode::Lenient => {
                    log::warn!("Skipping picture {}: {}", origin, reason);
                    content.skipped_images += 1;
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_probe_png() {
        assert_eq!(probe_dimensions(&png(7, 3)).unwrap(), (7, 3));
    }

    #[test]
    fn test_probe_garbage() {
        assert!(matches!(
            probe_dimensions(b"\x01\x00\x09\x00not a picture"),
            Err(Error::Image(_))
        ));
    }

    #[test]
    fn test_push_picture_strict_fails() {
        let mut content = ExtractedContent::default();
        let result = push_picture(&mut content, vec![0; 16], "rId9", &ExtractOptions::new());
        assert!(matches!(result, Err(Error::Image(msg)) if msg.starts_with("rId9")));
        assert!(content.is_empty());
    }

    #[test]
    fn test_push_picture_lenient_skips() {
        let mut content = ExtractedContent::default();
        let options = ExtractOptions::new().lenient();
        push_picture(&mut content, vec![0; 16], "rId9", &options).unwrap();
        push_picture(&mut content, png(2, 2), "rId10", &options).unwrap();
        assert_eq!(content.skipped_images, 1);
        assert_eq!(content.image_count(), 1);
    }

    #[test]
    fn test_truncated_png_body() {
        let mut data = png(64, 64);
        data.truncate(data.len() - 20);
        assert_eq!(probe_dimensions(&data).unwrap(), (64, 64));

        let mut content = ExtractedContent::default();
        let strict = push_picture(&mut content, data.clone(), "media/cut.png", &ExtractOptions::new());
        assert!(matches!(strict, Err(Error::Image(msg)) if msg.starts_with("media/cut.png")));

        let lenient = ExtractOptions::new().lenient();
        push_picture(&mut content, data, "media/cut.png", &lenient).unwrap();
        assert_eq!(content.skipped_images, 1);
        assert!(content.is_empty());
    }
}
