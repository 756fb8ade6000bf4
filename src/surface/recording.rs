//! Surface that records draw instructions instead of rendering them.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{text_width, FontFamily, FontWeight, OutputSurface};

/// A single instruction received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawInstruction {
    /// Text placed on the current page.
    Text {
        /// Text content
        text: String,
        /// Horizontal position in millimetres
        x: f32,
        /// Baseline position in millimetres from the page top
        y: f32,
        /// Font weight in effect
        weight: FontWeight,
        /// Font size in points
        size: f32,
    },

    /// A new page was started.
    PageBreak,

    /// The document was saved.
    Save {
        /// Target filename
        filename: String,
    },
}

impl DrawInstruction {
    /// Get the text if this is a text instruction.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawInstruction::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Check if this is a page break.
    pub fn is_page_break(&self) -> bool {
        matches!(self, DrawInstruction::PageBreak)
    }
}

/// Output surface that keeps every instruction in memory.
///
/// Measurement uses the same glyph tables as the PDF surface, so a layout
/// recorded here matches the one written to PDF for the same family.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    family: FontFamily,
    weight: FontWeight,
    size: f32,
    page_count: u32,
    instructions: Vec<DrawInstruction>,
}

impl RecordingSurface {
    /// Create a recording surface measuring with Courier metrics.
    pub fn new() -> Self {
        Self::with_family(FontFamily::Courier)
    }

    /// Create a recording surface measuring with the given family.
    pub fn with_family(family: FontFamily) -> Self {
        Self {
            family,
            weight: FontWeight::Normal,
            size: 16.0,
            page_count: 1,
            instructions: Vec::new(),
        }
    }

    /// Instructions recorded so far.
    pub fn instructions(&self) -> &[DrawInstruction] {
        &self.instructions
    }

    /// Consume the surface and return the recorded instructions.
    pub fn into_instructions(self) -> Vec<DrawInstruction> {
        self.instructions
    }

    /// Number of pages, including the first one.
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Texts of all text instructions, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.instructions
            .iter()
            .filter_map(DrawInstruction::text)
            .collect()
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSurface for RecordingSurface {
    fn set_font(&mut self, weight: FontWeight, size: f32) -> Result<()> {
        self.weight = weight;
        self.size = size;
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) -> Result<()> {
        self.instructions.push(DrawInstruction::Text {
            text: text.to_string(),
            x,
            y,
            weight: self.weight,
            size: self.size,
        });
        Ok(())
    }

    fn measure_text_width(&self, text: &str) -> Result<f32> {
        Ok(text_width(self.family, self.weight, self.size, text))
    }

    fn add_page(&mut self) -> Result<()> {
        self.page_count += 1;
        self.instructions.push(DrawInstruction::PageBreak);
        Ok(())
    }

    fn save(&mut self, filename: &str) -> Result<()> {
        self.instructions.push(DrawInstruction::Save {
            filename: filename.to_string(),
        });
        Ok(())
    }
}
