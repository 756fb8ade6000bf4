//! Render cursor.

use serde::{Deserialize, Serialize};

/// Position where the next run of text is drawn, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cursor {
    /// Horizontal offset from the left page edge
    pub x: f32,
    /// Baseline offset from the top page edge
    pub y: f32,
}

impl Cursor {
    /// Create a cursor at `(x, y)`.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Same vertical position, horizontal reset to `margin_left`.
    pub fn line_start(self, margin_left: f32) -> Self {
        Self {
            x: margin_left,
            y: self.y,
        }
    }

    /// Move down by `dy`.
    pub fn advance(self, dy: f32) -> Self {
        Self {
            x: self.x,
            y: self.y + dy,
        }
    }
}
