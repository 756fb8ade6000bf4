//! Layout options and configuration.

use serde::{Deserialize, Serialize};

use crate::markdown::LineKind;
use crate::surface::{FontWeight, PageSize};

/// How far the vertical cursor moves after a body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvancePolicy {
    /// Every body line advances by its visual line count times the body
    /// line height, plus the trailing gap.
    #[default]
    Uniform,
    /// Bold-containing lines advance by the trailing gap only, matching
    /// the layout produced by earlier releases.
    Compatible,
}

/// Font and spacing for one line classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Font weight
    pub weight: FontWeight,
    /// Font size in points
    pub size: f32,
    /// Vertical advance after the line, in millimetres
    pub advance: f32,
}

impl LineStyle {
    const fn bold(size: f32, advance: f32) -> Self {
        Self {
            weight: FontWeight::Bold,
            size,
            advance,
        }
    }
}

/// Options controlling page geometry and line spacing.
///
/// All lengths are in millimetres, font sizes in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Page dimensions
    pub page_size: PageSize,

    /// Top margin; the cursor returns here after a page break
    pub margin_top: f32,

    /// Bottom margin; a line starting below `height - margin_bottom` moves
    /// to a new page
    pub margin_bottom: f32,

    /// Left margin; the horizontal cursor resets here on every line
    pub margin_left: f32,

    /// Maximum width of a wrapped body line
    pub wrap_width: f32,

    /// Styles for `#`, `##` and `###` headings
    pub headings: [LineStyle; 3],

    /// Body text font size
    pub body_font_size: f32,

    /// Height of one visual body line
    pub body_line_height: f32,

    /// Extra gap after every body line
    pub body_trailing_gap: f32,

    /// Advance for a blank line
    pub blank_line_advance: f32,

    /// Body line advance rule
    pub advance_policy: AdvancePolicy,
}

impl LayoutOptions {
    /// Create layout options with defaults (A4, 20 mm margins).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    ///
    /// The wrap width follows the page so that the right margin matches
    /// the left one.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self.wrap_width = (page_size.width() - 2.0 * self.margin_left).max(1.0);
        self
    }

    /// Set top and bottom margins.
    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Set the left margin.
    pub fn with_margin_left(mut self, left: f32) -> Self {
        self.margin_left = left;
        self
    }

    /// Set the wrap width for body text.
    pub fn with_wrap_width(mut self, width: f32) -> Self {
        self.wrap_width = width;
        self
    }

    /// Set the body advance policy.
    pub fn with_advance_policy(mut self, policy: AdvancePolicy) -> Self {
        self.advance_policy = policy;
        self
    }

    /// Set the body font size.
    pub fn with_body_font_size(mut self, size: f32) -> Self {
        self.body_font_size = size;
        self
    }

    /// Lowest baseline at which a line may still start on the current page.
    pub fn page_limit(&self) -> f32 {
        self.page_size.height() - self.margin_bottom
    }

    /// Style of a heading line, or `None` for other kinds.
    pub fn heading_style(&self, kind: LineKind) -> Option<LineStyle> {
        kind.heading_level()
            .map(|level| self.headings[usize::from(level) - 1])
    }

    /// Vertical advance after a drawn body line.
    pub fn body_advance(&self, outcome: &super::BodyOutcome) -> f32 {
        let lines = outcome.visual_lines as f32 * self.body_line_height;
        match (self.advance_policy, outcome.path) {
            (AdvancePolicy::Compatible, super::BodyPath::Bold) => self.body_trailing_gap,
            _ => lines + self.body_trailing_gap,
        }
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin_top: 20.0,
            margin_bottom: 20.0,
            margin_left: 20.0,
            wrap_width: 170.0,
            headings: [
                LineStyle::bold(20.0, 15.0),
                LineStyle::bold(16.0, 12.0),
                LineStyle::bold(14.0, 10.0),
            ],
            body_font_size: 11.0,
            body_line_height: 6.0,
            body_trailing_gap: 4.0,
            blank_line_advance: 5.0,
            advance_policy: AdvancePolicy::Uniform,
        }
    }
}
