//! Output surfaces: the drawing backends the exporter lays text out on.
//!
//! The layout pass only talks to [`OutputSurface`]. Two implementations
//! ship with the crate:
//!
//! - [`PdfSurface`] writes a paginated PDF document
//! - [`RecordingSurface`] records the draw instructions it receives
//!
//! Positions are in millimetres, measured from the top-left corner of the
//! page; `y` is the text baseline.

mod metrics;
mod pdf;
mod recording;
mod wrap;

pub use metrics::{text_width, FontFamily, POINTS_PER_MM};
pub use pdf::{PdfInfo, PdfSurface};
pub use recording::{DrawInstruction, RecordingSurface};
pub use wrap::wrap_greedy;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Font weight used for a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight
    #[default]
    Normal,
    /// Bold weight
    Bold,
}

/// Page dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// ISO A4 (210 x 297 mm)
    #[default]
    A4,
    /// US Letter (8.5 x 11 inches)
    Letter,
    /// Custom width and height in millimetres
    Custom {
        /// Width in millimetres
        width: f32,
        /// Height in millimetres
        height: f32,
    },
}

impl PageSize {
    /// Page width in millimetres.
    pub fn width(&self) -> f32 {
        match *self {
            PageSize::A4 => 210.0,
            PageSize::Letter => 215.9,
            PageSize::Custom { width, .. } => width,
        }
    }

    /// Page height in millimetres.
    pub fn height(&self) -> f32 {
        match *self {
            PageSize::A4 => 297.0,
            PageSize::Letter => 279.4,
            PageSize::Custom { height, .. } => height,
        }
    }

    /// Parse a page size name ("a4", "letter").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Some(PageSize::A4),
            "letter" => Some(PageSize::Letter),
            _ => None,
        }
    }
}

/// Capability set the exporter draws through.
///
/// Any backend implementing this trait can replace the PDF writer without
/// changing the layout logic. Failures propagate to the caller unchanged.
pub trait OutputSurface {
    /// Select the weight and size (in points) for subsequent text.
    fn set_font(&mut self, weight: FontWeight, size: f32) -> Result<()>;

    /// Draw `text` with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32) -> Result<()>;

    /// Width of `text` in the current font, in millimetres.
    fn measure_text_width(&self, text: &str) -> Result<f32>;

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// The default implementation wraps greedily on spaces using
    /// [`OutputSurface::measure_text_width`].
    fn wrap_text(&self, text: &str, max_width: f32) -> Result<Vec<String>> {
        wrap_greedy(text, max_width, |s| self.measure_text_width(s))
    }

    /// Start a new page.
    fn add_page(&mut self) -> Result<()>;

    /// Write the finished document to `filename`.
    fn save(&mut self, filename: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_dimensions() {
        assert_eq!(PageSize::A4.width(), 210.0);
        assert_eq!(PageSize::A4.height(), 297.0);
        let custom = PageSize::Custom {
            width: 100.0,
            height: 150.0,
        };
        assert_eq!(custom.height(), 150.0);
    }

    #[test]
    fn test_page_size_parse() {
        assert_eq!(PageSize::parse("A4"), Some(PageSize::A4));
        assert_eq!(PageSize::parse(" letter "), Some(PageSize::Letter));
        assert_eq!(PageSize::parse("tabloid"), None);
    }
}
