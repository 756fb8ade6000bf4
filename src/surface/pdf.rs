//! PDF output surface built on lopdf.

use std::fs;
use std::io::Write;

use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

use super::{text_width, FontFamily, FontWeight, OutputSurface, PageSize, POINTS_PER_MM};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// Document information dictionary entries.
#[derive(Debug, Clone, Default)]
pub struct PdfInfo {
    /// Document title
    pub title: Option<String>,
    /// Producing application
    pub producer: Option<String>,
    /// Creation timestamp
    pub creation_date: Option<DateTime<Utc>>,
}

impl PdfInfo {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.producer.is_none() && self.creation_date.is_none()
    }
}

/// Output surface that produces a PDF document.
///
/// Text uses the standard Type1 fonts with WinAnsi encoding, so no font
/// data is embedded. Pages are kept as operation lists until the document
/// is serialized.
pub struct PdfSurface {
    page_size: PageSize,
    family: FontFamily,
    weight: FontWeight,
    size: f32,
    pages: Vec<Vec<Operation>>,
    info: PdfInfo,
    compress: bool,
    replaced_chars: usize,
}

impl PdfSurface {
    /// Create a surface with one empty page.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            family: FontFamily::default(),
            weight: FontWeight::Normal,
            size: 16.0,
            pages: vec![Vec::new()],
            info: PdfInfo::default(),
            compress: true,
            replaced_chars: 0,
        }
    }

    /// Set the font family.
    pub fn with_family(mut self, family: FontFamily) -> Self {
        self.family = family;
        self
    }

    /// Set the document information entries.
    pub fn with_info(mut self, info: PdfInfo) -> Self {
        self.info = info;
        self
    }

    /// Enable or disable Flate compression of content streams.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of characters that could not be encoded and were replaced.
    pub fn replaced_chars(&self) -> usize {
        self.replaced_chars
    }

    /// Serialize the document to PDF bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut doc = self.build_document()?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }

    fn build_document(&self) -> Result<Document> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(self.font_dictionary(FontWeight::Normal));
        let bold_id = doc.add_object(self.font_dictionary(FontWeight::Bold));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => regular_id,
                FONT_BOLD => bold_id,
            },
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in &self.pages {
            let content_id = self.add_content_stream(&mut doc, operations)?;
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page_size.width() * POINTS_PER_MM),
                Object::Real(self.page_size.height() * POINTS_PER_MM),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if !self.info.is_empty() {
            let info_id = doc.add_object(self.info_dictionary());
            doc.trailer.set("Info", info_id);
        }

        Ok(doc)
    }

    fn font_dictionary(&self, weight: FontWeight) -> lopdf::Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.family.base_font(weight),
            "Encoding" => "WinAnsiEncoding",
        }
    }

    fn info_dictionary(&self) -> lopdf::Dictionary {
        let mut info = lopdf::Dictionary::new();
        if let Some(ref title) = self.info.title {
            info.set("Title", Object::string_literal(encode_win_ansi(title).0));
        }
        if let Some(ref producer) = self.info.producer {
            info.set("Producer", Object::string_literal(encode_win_ansi(producer).0));
        }
        if let Some(date) = self.info.creation_date {
            let stamp = format!("D:{}Z", date.format("%Y%m%d%H%M%S"));
            info.set("CreationDate", Object::string_literal(stamp));
        }
        info
    }

    fn add_content_stream(&self, doc: &mut Document, operations: &[Operation]) -> Result<ObjectId> {
        let content = Content {
            operations: operations.to_vec(),
        };
        let data = content.encode()?;

        let stream = if self.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&data)?;
            let compressed = encoder.finish()?;
            Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed)
        } else {
            Stream::new(lopdf::Dictionary::new(), data)
        };

        Ok(doc.add_object(stream))
    }

    fn current_page(&mut self) -> Result<&mut Vec<Operation>> {
        self.pages
            .last_mut()
            .ok_or_else(|| Error::Render("surface has no page".into()))
    }
}

impl OutputSurface for PdfSurface {
    fn set_font(&mut self, weight: FontWeight, size: f32) -> Result<()> {
        if !(size.is_finite() && size > 0.0) {
            return Err(Error::Render(format!("invalid font size: {}", size)));
        }
        self.weight = weight;
        self.size = size;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) -> Result<()> {
        let (encoded, replaced) = encode_win_ansi(text);
        if replaced > 0 {
            log::warn!(
                "{} character(s) not representable in {} replaced with '?'",
                replaced,
                self.family
            );
            self.replaced_chars += replaced;
        }

        let font = match self.weight {
            FontWeight::Normal => FONT_REGULAR,
            FontWeight::Bold => FONT_BOLD,
        };
        let x_pt = x * POINTS_PER_MM;
        let y_pt = (self.page_size.height() - y) * POINTS_PER_MM;
        let size = self.size;

        let page = self.current_page()?;
        page.push(Operation::new("BT", vec![]));
        page.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), Object::Real(size)],
        ));
        page.push(Operation::new(
            "Td",
            vec![Object::Real(x_pt), Object::Real(y_pt)],
        ));
        page.push(Operation::new("Tj", vec![Object::string_literal(encoded)]));
        page.push(Operation::new("ET", vec![]));
        Ok(())
    }

    fn measure_text_width(&self, text: &str) -> Result<f32> {
        Ok(text_width(self.family, self.weight, self.size, text))
    }

    fn add_page(&mut self) -> Result<()> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn save(&mut self, filename: &str) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(filename, bytes)?;
        log::debug!("Saved {} page(s) to {}", self.pages.len(), filename);
        Ok(())
    }
}

/// Encode text for a WinAnsi font.
///
/// Returns the bytes and the number of characters replaced with `?`.
fn encode_win_ansi(text: &str) -> (Vec<u8>, usize) {
    let mut replaced = 0;
    let bytes = text
        .nfc()
        .map(|ch| match win_ansi_byte(ch) {
            Some(b) => b,
            None => {
                replaced += 1;
                b'?'
            }
        })
        .collect();
    (bytes, replaced)
}

fn win_ansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        ' '..='~' => ch as u8,
        '\t' => b' ',
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(byte)
}
