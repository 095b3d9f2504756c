//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// Encode a blank RGB picture.
pub fn picture(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
        .write_to(&mut out, format)
        .unwrap();
    out.into_inner()
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    picture(width, height, image::ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    picture(width, height, image::ImageFormat::Jpeg)
}

/// A paragraph with one text run per entry.
pub fn paragraph(runs: &[&str]) -> String {
    let mut xml = String::from("<w:p>");
    for run in runs {
        xml.push_str(&format!(
            r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#,
            run
        ));
    }
    xml.push_str("</w:p>");
    xml
}

/// A paragraph holding one inline picture.
pub fn picture_paragraph(rel_id: &str) -> String {
    format!(
        r#"<w:p><w:r><w:drawing><a:graphic><a:graphicData><a:blip r:embed="{}"/></a:graphicData></a:graphic></w:drawing></w:r></w:p>"#,
        rel_id
    )
}

/// Builder for minimal DOCX packages.
#[derive(Default)]
pub struct DocxBuilder {
    body: String,
    media: Vec<(String, String, Vec<u8>)>,
    core: Option<(String, String)>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn xml(mut self, xml: &str) -> Self {
        self.body.push_str(xml);
        self
    }

    pub fn text(self, runs: &[&str]) -> Self {
        let xml = paragraph(runs);
        self.xml(&xml)
    }

    /// Add a picture part and a paragraph that shows it.
    pub fn picture(mut self, file_name: &str, data: Vec<u8>) -> Self {
        let rel_id = format!("rId{}", self.media.len() + 10);
        self.body.push_str(&picture_paragraph(&rel_id));
        self.media.push((rel_id, file_name.to_string(), data));
        self
    }

    pub fn core(mut self, title: &str, creator: &str) -> Self {
        self.core = Some((title.to_string(), creator.to_string()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#,
        )
        .unwrap();

        zip.start_file("word/document.xml", options).unwrap();
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="{}" xmlns:r="{}" xmlns:a="{}"><w:body>{}</w:body></w:document>"#,
            W_NS, R_NS, A_NS, self.body
        );
        zip.write_all(document.as_bytes()).unwrap();

        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (rel_id, file_name, data) in &self.media {
            rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/{}"/>"#,
                rel_id, file_name
            ));
            zip.start_file(format!("word/media/{}", file_name), options)
                .unwrap();
            zip.write_all(data).unwrap();
        }
        rels.push_str("</Relationships>");
        zip.start_file("word/_rels/document.xml.rels", options)
            .unwrap();
        zip.write_all(rels.as_bytes()).unwrap();

        if let Some((title, creator)) = &self.core {
            zip.start_file("docProps/core.xml", options).unwrap();
            let core = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{}</dc:title><dc:creator>{}</dc:creator></cp:coreProperties>"#,
                title, creator
            );
            zip.write_all(core.as_bytes()).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }
}

/// Offset of the text piece inside the WordDocument stream.
const TEXT_OFFSET: usize = 0x400;

/// Build a Word 97 document whose main story is `text` (cp1252, `\r` ends paragraphs).
///
/// `data` becomes the Data stream when given. `flags` is written to the FIB.
pub fn legacy_doc(text: &str, data: Option<&[u8]>, flags: u16) -> Vec<u8> {
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| doc2pdf::encoding::encode_char(c).unwrap_or(c as u8))
        .collect();

    // FIB: FibBase, 14 rgW words, 22 rgLw longs, 93 fc/lcb pairs.
    let mut word = vec![0u8; 32];
    word[0..2].copy_from_slice(&0xA5ECu16.to_le_bytes());
    word[0x0A..0x0C].copy_from_slice(&flags.to_le_bytes());
    word.extend_from_slice(&14u16.to_le_bytes());
    word.extend_from_slice(&[0u8; 28]);
    word.extend_from_slice(&22u16.to_le_bytes());
    let mut rg_lw = [0u8; 88];
    rg_lw[12..16].copy_from_slice(&(bytes.len() as u32).to_le_bytes());
    word.extend_from_slice(&rg_lw);
    word.extend_from_slice(&93u16.to_le_bytes());

    // One compressed piece covering the whole story.
    let mut clx = vec![0x02];
    clx.extend_from_slice(&16u32.to_le_bytes());
    clx.extend_from_slice(&0u32.to_le_bytes());
    clx.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    clx.extend_from_slice(&[0, 0]);
    clx.extend_from_slice(&(((TEXT_OFFSET * 2) as u32) | 0x4000_0000).to_le_bytes());
    clx.extend_from_slice(&[0, 0]);

    let mut rg_fc_lcb = vec![0u8; 93 * 8];
    rg_fc_lcb[264..268].copy_from_slice(&0u32.to_le_bytes());
    rg_fc_lcb[268..272].copy_from_slice(&(clx.len() as u32).to_le_bytes());
    word.extend_from_slice(&rg_fc_lcb);

    word.resize(TEXT_OFFSET, 0);
    word.extend_from_slice(&bytes);

    let table = if flags & 0x0200 != 0 { "1Table" } else { "0Table" };

    let mut file = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    file.create_stream("WordDocument")
        .unwrap()
        .write_all(&word)
        .unwrap();
    file.create_stream(table).unwrap().write_all(&clx).unwrap();
    if let Some(data) = data {
        file.create_stream("Data").unwrap().write_all(data).unwrap();
    }
    file.flush().unwrap();
    file.into_inner().into_inner()
}
