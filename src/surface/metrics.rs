//! Glyph widths for the standard PDF Type1 fonts.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

use super::FontWeight;

/// PDF points per millimetre (72 / 25.4).
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Width used for characters outside the printable ASCII tables.
const HELVETICA_FALLBACK: u16 = 556;
const COURIER_WIDTH: u16 = 600;

// Widths in 1/1000 em for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Standard font family available without embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Proportional sans-serif
    #[default]
    Helvetica,
    /// Monospaced
    Courier,
}

impl FontFamily {
    /// Look up a family by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "helvetica" | "sans-serif" => Ok(FontFamily::Helvetica),
            "courier" | "monospace" => Ok(FontFamily::Courier),
            _ => Err(Error::UnsupportedFont(name.to_string())),
        }
    }

    /// PostScript name of the font for a weight.
    pub fn base_font(self, weight: FontWeight) -> &'static str {
        match (self, weight) {
            (FontFamily::Helvetica, FontWeight::Normal) => "Helvetica",
            (FontFamily::Helvetica, FontWeight::Bold) => "Helvetica-Bold",
            (FontFamily::Courier, FontWeight::Normal) => "Courier",
            (FontFamily::Courier, FontWeight::Bold) => "Courier-Bold",
        }
    }

    /// Advance width of a character in 1/1000 em.
    pub fn glyph_width(self, ch: char, weight: FontWeight) -> u16 {
        match self {
            FontFamily::Courier => COURIER_WIDTH,
            FontFamily::Helvetica => {
                let table = match weight {
                    FontWeight::Normal => &HELVETICA,
                    FontWeight::Bold => &HELVETICA_BOLD,
                };
                match ch {
                    ' '..='~' => table[ch as usize - 0x20],
                    _ => HELVETICA_FALLBACK,
                }
            }
        }
    }
}

impl std::fmt::Display for FontFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.base_font(FontWeight::Normal))
    }
}

/// Width of `text` in millimetres at `size` points.
pub fn text_width(family: FontFamily, weight: FontWeight, size: f32, text: &str) -> f32 {
    let units: u32 = text
        .nfc()
        .map(|ch| u32::from(family.glyph_width(ch, weight)))
        .sum();
    units as f32 / 1000.0 * size / POINTS_PER_MM
}
