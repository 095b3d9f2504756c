//! Image XObject encoding.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Object, Stream};
use std::io::Write;

use crate::error::Result;

/// Encoded image ready to be added to the document.
pub(crate) struct ImageXObject {
    /// The image XObject itself
    pub image: Stream,
    /// Gray soft mask carrying the alpha channel, if any
    pub mask: Option<Stream>,
}

/// Build the XObject streams for an encoded picture.
///
/// Baseline gray and RGB JPEGs are embedded as-is with DCTDecode. Anything
/// else is decoded and stored as Flate-compressed 8-bit RGB.
pub(crate) fn encode(data: &[u8]) -> Result<ImageXObject> {
    if let Some(header) = jpeg_header(data) {
        if let Some(color_space) = header.color_space() {
            let dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => header.width as i64,
                "Height" => header.height as i64,
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            };
            return Ok(ImageXObject {
                image: Stream::new(dict, data.to_vec()).with_compression(false),
                mask: None,
            });
        }
    }

    let decoded = image::load_from_memory(data)?;
    let (width, height) = (decoded.width() as i64, decoded.height() as i64);
    let mask = if decoded.color().has_alpha() {
        let alpha: Vec<u8> = decoded.to_rgba8().pixels().map(|p| p[3]).collect();
        Some(flate_stream(width, height, "DeviceGray", &alpha)?)
    } else {
        None
    };
    let rgb = decoded.to_rgb8();

    Ok(ImageXObject {
        image: flate_stream(width, height, "DeviceRGB", rgb.as_raw())?,
        mask,
    })
}

fn flate_stream(width: i64, height: i64, color_space: &str, samples: &[u8]) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(samples)?;
    let compressed = encoder.finish()?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => Object::Name(color_space.as_bytes().to_vec()),
        "BitsPerComponent" => 8_i64,
        "Filter" => "FlateDecode",
    };
    Ok(Stream::new(dict, compressed).with_compression(false))
}

/// Check if a picture is embedded as-is, without being decoded.
pub(crate) fn embeds_verbatim(data: &[u8]) -> bool {
    jpeg_header(data).is_some_and(|header| header.color_space().is_some())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JpegHeader {
    width: u32,
    height: u32,
    components: u8,
}

impl JpegHeader {
    fn color_space(&self) -> Option<&'static str> {
        match self.components {
            1 => Some("DeviceGray"),
            3 => Some("DeviceRGB"),
            _ => None,
        }
    }
}

/// Read the frame header of a JPEG without decoding it.
fn jpeg_header(data: &[u8]) -> Option<JpegHeader> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    loop {
        if *data.get(pos)? != 0xFF {
            return None;
        }
        while *data.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = *data.get(pos)?;
        pos += 1;
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            continue;
        }
        if marker == 0xD9 || marker == 0xDA {
            return None;
        }
        let len = u16::from_be_bytes([*data.get(pos)?, *data.get(pos + 1)?]) as usize;

        // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC)
        if matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let frame = data.get(pos + 2..pos + 8)?;
            return Some(JpegHeader {
                height: u16::from_be_bytes([frame[1], frame[2]]) as u32,
                width: u16::from_be_bytes([frame[3], frame[4]]) as u32,
                components: frame[5],
            });
        }
        if len < 2 {
            return None;
        }
        pos += len;
    }
}
