//! PDF emitter backed by `lopdf`.

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeMap;

use crate::encoding;
use crate::error::{Error, Result};
use crate::model::{PageGeometry, Point};

use super::{xobject, PdfEmitter, StandardFont};

const PDF_VERSION: &str = "1.5";

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfInfo {
    /// `Title` entry
    pub title: Option<String>,

    /// `Author` entry
    pub author: Option<String>,

    /// `CreationDate` entry, written in UTC
    pub creation_date: Option<DateTime<Utc>>,
}

/// A page being written: its object id and the resources its streams use.
struct PageSlot {
    id: ObjectId,
    contents: Vec<ObjectId>,
    fonts: BTreeMap<StandardFont, ObjectId>,
    xobjects: BTreeMap<String, ObjectId>,
}

/// Builds a PDF in memory with `lopdf`.
///
/// Every page has the same geometry. Fonts are created once per document and
/// shared across pages; each picture becomes its own image XObject.
pub struct LopdfEmitter {
    doc: Document,
    geometry: PageGeometry,
    info: PdfInfo,
    pages_id: ObjectId,
    pages: Vec<PageSlot>,
    fonts: BTreeMap<StandardFont, ObjectId>,
    /// Operations of the open content stream, if any
    operations: Option<Vec<Operation>>,
    image_count: usize,
    replaced_chars: usize,
    saved: bool,
}

impl LopdfEmitter {
    /// Create an empty document whose pages use `geometry`.
    pub fn new(geometry: PageGeometry) -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            geometry,
            info: PdfInfo::default(),
            pages_id,
            pages: Vec::new(),
            fonts: BTreeMap::new(),
            operations: None,
            image_count: 0,
            replaced_chars: 0,
            saved: false,
        }
    }

    /// Set the information dictionary entries.
    pub fn with_info(mut self, info: PdfInfo) -> Self {
        self.info = info;
        self
    }

    /// Characters replaced with `?` because the font encoding lacks them.
    pub fn replaced_chars(&self) -> usize {
        self.replaced_chars
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.saved {
            return Err(Error::Emission("document has already been saved".into()));
        }
        Ok(())
    }

    fn open_operations(&mut self) -> Result<&mut Vec<Operation>> {
        self.operations
            .as_mut()
            .ok_or_else(|| Error::Emission("no content stream is open".into()))
    }

    fn current_page(&mut self) -> Result<&mut PageSlot> {
        self.pages
            .last_mut()
            .ok_or_else(|| Error::Emission("no page has been added".into()))
    }

    fn font_id(&mut self, font: StandardFont) -> ObjectId {
        if let Some(id) = self.fonts.get(&font) {
            return *id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        self.fonts.insert(font, id);
        id
    }

    fn write_page_tree(&mut self) {
        let media_box = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(self.geometry.width),
            Object::Real(self.geometry.height),
        ];

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let mut fonts = Dictionary::new();
            for (font, id) in &page.fonts {
                fonts.set(font.resource_name(), *id);
            }
            let mut xobjects = Dictionary::new();
            for (name, id) in &page.xobjects {
                xobjects.set(name.as_str(), *id);
            }
            let mut resources = Dictionary::new();
            if !page.fonts.is_empty() {
                resources.set("Font", fonts);
            }
            if !page.xobjects.is_empty() {
                resources.set("XObject", xobjects);
            }

            let contents: Vec<Object> = page.contents.iter().map(|id| (*id).into()).collect();
            self.doc.objects.insert(
                page.id,
                Object::Dictionary(dictionary! {
                    "Type" => "Page",
                    "Parent" => self.pages_id,
                    "Resources" => resources,
                    "Contents" => contents,
                }),
            );
            kids.push(Object::Reference(page.id));
        }

        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => media_box,
            }),
        );
    }

    fn info_dictionary(&self) -> Dictionary {
        let mut info = dictionary! {
            "Producer" => text_string(&format!("doc2pdf {}", env!("CARGO_PKG_VERSION"))),
        };
        if let Some(title) = &self.info.title {
            info.set("Title", text_string(title));
        }
        if let Some(author) = &self.info.author {
            info.set("Author", text_string(author));
        }
        if let Some(date) = &self.info.creation_date {
            let stamp = date.format("D:%Y%m%d%H%M%SZ").to_string();
            info.set("CreationDate", Object::string_literal(stamp));
        }
        info
    }
}

impl PdfEmitter for LopdfEmitter {
    fn add_page(&mut self) -> Result<PageGeometry> {
        self.ensure_writable()?;
        if self.operations.is_some() {
            return Err(Error::Emission(
                "cannot add a page while a content stream is open".into(),
            ));
        }
        let id = self.doc.new_object_id();
        self.pages.push(PageSlot {
            id,
            contents: Vec::new(),
            fonts: BTreeMap::new(),
            xobjects: BTreeMap::new(),
        });
        log::debug!("Added page {}", self.pages.len());
        Ok(self.geometry)
    }

    fn open_content(&mut self) -> Result<()> {
        self.ensure_writable()?;
        self.current_page()?;
        if self.operations.is_some() {
            return Err(Error::Emission("content stream is already open".into()));
        }
        self.operations = Some(Vec::new());
        Ok(())
    }

    fn close_content(&mut self) -> Result<()> {
        let operations = self
            .operations
            .take()
            .ok_or_else(|| Error::Emission("no content stream is open".into()))?;
        let content = Content { operations }.encode()?;
        let id = self.doc.add_object(Stream::new(Dictionary::new(), content));
        self.current_page()?.contents.push(id);
        Ok(())
    }

    fn draw_text(&mut self, at: Point, text: &str, font: StandardFont, size: f32) -> Result<()> {
        self.open_operations()?;
        let font_id = self.font_id(font);
        self.current_page()?.fonts.insert(font, font_id);

        let (bytes, replaced) = encoding::encode_lossy(text);
        if replaced > 0 {
            log::debug!("Replaced {} characters the font cannot show", replaced);
            self.replaced_chars += replaced;
        }

        self.open_operations()?.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![font.resource_name().into(), Object::Real(size)],
            ),
            Operation::new("Td", vec![Object::Real(at.x), Object::Real(at.y)]),
            Operation::new("Tj", vec![Object::String(bytes, StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }

    fn draw_image(&mut self, at: Point, data: &[u8], width: f32, height: f32) -> Result<()> {
        self.open_operations()?;
        let encoded = xobject::encode(data)?;

        let mut image = encoded.image;
        if let Some(mask) = encoded.mask {
            let mask_id = self.doc.add_object(mask);
            image.dict.set("SMask", mask_id);
        }
        let image_id = self.doc.add_object(image);

        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        self.current_page()?.xobjects.insert(name.clone(), image_id);

        self.open_operations()?.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(height),
                    Object::Real(at.x),
                    Object::Real(at.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn save(&mut self) -> Result<Vec<u8>> {
        self.ensure_writable()?;
        if self.operations.is_some() {
            return Err(Error::Emission(
                "cannot save while a content stream is open".into(),
            ));
        }
        if self.pages.is_empty() {
            return Err(Error::Emission("document has no pages".into()));
        }

        self.write_page_tree();
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let info_id = self.doc.add_object(self.info_dictionary());
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);
        self.doc.compress();
        self.saved = true;

        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        log::debug!(
            "Saved {} pages, {} images, {} bytes",
            self.pages.len(),
            self.image_count,
            buffer.len()
        );
        Ok(buffer)
    }
}

/// A PDF text string: literal WinAnsi bytes when possible, UTF-16BE otherwise.
fn text_string(text: &str) -> Object {
    let bytes: Option<Vec<u8>> = text.chars().map(encoding::encode_char).collect();
    match bytes {
        Some(bytes) => Object::String(bytes, StringFormat::Literal),
        None => {
            let mut utf16 = vec![0xFE, 0xFF];
            for unit in text.encode_utf16() {
                utf16.extend_from_slice(&unit.to_be_bytes());
            }
            Object::String(utf16, StringFormat::Hexadecimal)
        }
    }
}
