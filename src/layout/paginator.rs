//! Line classification, font selection and pagination.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::markdown::{lines, Line, LineKind};
use crate::surface::{FontWeight, OutputSurface};

use super::{render_body_line, BodyPath, Cursor, LayoutOptions};

/// Statistics collected during one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Pages used, including the first
    pub page_count: u32,

    /// Heading lines drawn
    pub heading_count: u32,

    /// Blank lines skipped
    pub blank_count: u32,

    /// Body lines drawn
    pub body_count: u32,

    /// Body lines drawn on the mixed-weight path
    pub bold_line_count: u32,

    /// Visual lines produced by wrapping body text
    pub visual_line_count: u32,

    /// Cursor after the last line
    pub final_cursor: Cursor,
}

/// Walks a document line by line and draws it onto a surface.
pub struct Paginator<'a> {
    surface: &'a mut dyn OutputSurface,
    options: &'a LayoutOptions,
    stats: LayoutStats,
}

impl<'a> Paginator<'a> {
    /// Create a paginator drawing onto `surface`.
    pub fn new(surface: &'a mut dyn OutputSurface, options: &'a LayoutOptions) -> Self {
        Self {
            surface,
            options,
            stats: LayoutStats {
                page_count: 1,
                ..Default::default()
            },
        }
    }

    /// Lay out every line of `document`, starting at the top-left margin.
    pub fn run(mut self, document: &str) -> Result<LayoutStats> {
        let start = Cursor::new(self.options.margin_left, self.options.margin_top);
        let end = lines(document).try_fold(start, |cursor, line| self.render_line(cursor, &line))?;

        self.stats.final_cursor = end;
        log::debug!(
            "Laid out {} heading(s), {} body line(s) on {} page(s)",
            self.stats.heading_count,
            self.stats.body_count,
            self.stats.page_count
        );
        Ok(self.stats)
    }

    /// Draw one line and return the cursor for the next.
    fn render_line(&mut self, cursor: Cursor, line: &Line<'_>) -> Result<Cursor> {
        let cursor = self.break_page_if_needed(cursor)?.line_start(self.options.margin_left);

        match line.kind {
            LineKind::Heading1 | LineKind::Heading2 | LineKind::Heading3 => {
                let style = self
                    .options
                    .heading_style(line.kind)
                    .unwrap_or(self.options.headings[0]);
                self.surface.set_font(style.weight, style.size)?;
                self.surface.draw_text(line.content(), cursor.x, cursor.y)?;
                self.stats.heading_count += 1;
                Ok(cursor.advance(style.advance))
            }
            LineKind::Blank => {
                self.stats.blank_count += 1;
                Ok(cursor.advance(self.options.blank_line_advance))
            }
            LineKind::Body => {
                self.surface
                    .set_font(FontWeight::Normal, self.options.body_font_size)?;
                let outcome =
                    render_body_line(&mut *self.surface, line.content(), cursor, self.options)?;

                self.stats.body_count += 1;
                self.stats.visual_line_count += outcome.visual_lines as u32;
                if outcome.path == BodyPath::Bold {
                    self.stats.bold_line_count += 1;
                }
                Ok(cursor.advance(self.options.body_advance(&outcome)))
            }
        }
    }

    /// Start a new page when the cursor is past the printable area.
    fn break_page_if_needed(&mut self, cursor: Cursor) -> Result<Cursor> {
        if cursor.y <= self.options.page_limit() {
            return Ok(cursor);
        }
        self.surface.add_page()?;
        self.stats.page_count += 1;
        Ok(Cursor::new(cursor.x, self.options.margin_top))
    }
}

/// Lay out a markdown document onto a surface.
///
/// # Example
///
/// ```
/// use mdstudio::layout::{layout_document, LayoutOptions};
/// use mdstudio::surface::RecordingSurface;
///
/// let mut surface = RecordingSurface::new();
/// let stats = layout_document("# Title\n\nBody", &mut surface, &LayoutOptions::default())?;
/// assert_eq!(stats.page_count, 1);
/// assert_eq!(surface.texts(), vec!["Title", "Body"]);
/// # Ok::<(), mdstudio::Error>(())
/// ```
pub fn layout_document(
    document: &str,
    surface: &mut dyn OutputSurface,
    options: &LayoutOptions,
) -> Result<LayoutStats> {
    Paginator::new(surface, options).run(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::AdvancePolicy;
    use crate::surface::{DrawInstruction, RecordingSurface};

    fn record(document: &str, options: &LayoutOptions) -> (LayoutStats, Vec<DrawInstruction>) {
        let mut surface = RecordingSurface::new();
        let stats = layout_document(document, &mut surface, options).unwrap();
        (stats, surface.into_instructions())
    }

    #[test]
    fn test_title_blank_bold_scenario() {
        let options = LayoutOptions::default();
        let (stats, instructions) =
            record("# Title\n\nSome **bold** and normal text.", &options);

        assert_eq!(instructions.len(), 4);
        assert_eq!(
            instructions[0],
            DrawInstruction::Text {
                text: "Title".to_string(),
                x: 20.0,
                y: 20.0,
                weight: FontWeight::Bold,
                size: 20.0,
            }
        );

        // Heading advance 15, blank advance 5
        let expected = [
            ("Some ", FontWeight::Normal),
            ("bold", FontWeight::Bold),
            (" and normal text.", FontWeight::Normal),
        ];
        for (instruction, (text, weight)) in instructions[1..].iter().zip(expected) {
            match instruction {
                DrawInstruction::Text {
                    text: t,
                    y,
                    weight: w,
                    size,
                    ..
                } => {
                    assert_eq!(t, text);
                    assert_eq!(*w, weight);
                    assert_eq!(*y, 40.0);
                    assert_eq!(*size, 11.0);
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        assert!(!instructions.iter().any(DrawInstruction::is_page_break));
        assert_eq!(stats.page_count, 1);
        assert_eq!(stats.bold_line_count, 1);
        assert_eq!(stats.final_cursor.y, 50.0);
    }

    #[test]
    fn test_compatible_policy_bold_advance() {
        let options = LayoutOptions::default().with_advance_policy(AdvancePolicy::Compatible);
        let (stats, _) = record("Some **bold** text", &options);
        assert_eq!(stats.final_cursor.y, 24.0);

        let (stats, _) = record("Some plain text", &options);
        assert_eq!(stats.final_cursor.y, 30.0);
    }

    #[test]
    fn test_blank_lines_advance_five_each() {
        let options = LayoutOptions::default();
        for n in 1..=10 {
            let document = vec![""; n].join("\n");
            let (stats, instructions) = record(&document, &options);
            assert!(instructions.is_empty());
            assert_eq!(stats.blank_count, n as u32);
            assert_eq!(stats.final_cursor.y, 20.0 + 5.0 * n as f32);
        }
    }

    #[test]
    fn test_heading_sizes_and_advances() {
        let options = LayoutOptions::default();
        let (stats, instructions) = record("# A\n## B\n### C\nbody", &options);

        let positions: Vec<_> = instructions
            .iter()
            .map(|i| match i {
                DrawInstruction::Text { y, size, weight, .. } => (*y, *size, *weight),
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(
            positions,
            vec![
                (20.0, 20.0, FontWeight::Bold),
                (35.0, 16.0, FontWeight::Bold),
                (47.0, 14.0, FontWeight::Bold),
                (57.0, 11.0, FontWeight::Normal),
            ]
        );
        assert_eq!(stats.heading_count, 3);
    }

    #[test]
    fn test_page_break_where_cursor_passes_limit() {
        let options = LayoutOptions::default();
        // Each body line advances 6 + 4 = 10: lines start at 20, 30, ..., 270.
        // The 27th line would start at 280 > 277.
        let document = vec!["line"; 30].join("\n");
        let (stats, instructions) = record(&document, &options);

        let break_index = instructions
            .iter()
            .position(DrawInstruction::is_page_break)
            .unwrap();
        assert_eq!(break_index, 26);
        assert_eq!(stats.page_count, 2);

        match &instructions[break_index + 1] {
            DrawInstruction::Text { y, .. } => assert_eq!(*y, 20.0),
            other => panic!("unexpected {:?}", other),
        }
        match &instructions[break_index - 1] {
            DrawInstruction::Text { y, .. } => assert_eq!(*y, 270.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_long_document_spans_several_pages() {
        let paragraph = "word ".repeat(200);
        let document = vec![paragraph.as_str(); 12].join("\n");
        let (stats, instructions) = record(&document, &LayoutOptions::default());

        assert!(stats.page_count >= 2);
        let breaks = instructions.iter().filter(|i| i.is_page_break()).count();
        assert_eq!(breaks as u32, stats.page_count - 1);

        // Every new page starts at the top margin
        for (i, instruction) in instructions.iter().enumerate() {
            if instruction.is_page_break() {
                match &instructions[i + 1] {
                    DrawInstruction::Text { y, .. } => assert_eq!(*y, 20.0),
                    other => panic!("unexpected {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_tall_line_not_split() {
        // A single wrapped paragraph taller than the page stays on one page
        let document = "word ".repeat(2000);
        let (stats, instructions) = record(&document, &LayoutOptions::default());
        assert_eq!(stats.page_count, 1);
        assert!(!instructions.iter().any(DrawInstruction::is_page_break));
        assert!(stats.final_cursor.y > 297.0);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let document = "# Notes\n\nA **b** c\n\n- item *one*\n".repeat(40);
        let options = LayoutOptions::default();
        assert_eq!(record(&document, &options), record(&document, &options));
    }

    #[test]
    fn test_surface_errors_propagate() {
        struct FailingSurface;

        impl OutputSurface for FailingSurface {
            fn set_font(&mut self, _weight: FontWeight, _size: f32) -> Result<()> {
                Err(crate::Error::UnsupportedFont("missing".into()))
            }
            fn draw_text(&mut self, _text: &str, _x: f32, _y: f32) -> Result<()> {
                Ok(())
            }
            fn measure_text_width(&self, _text: &str) -> Result<f32> {
                Ok(0.0)
            }
            fn add_page(&mut self) -> Result<()> {
                Ok(())
            }
            fn save(&mut self, _filename: &str) -> Result<()> {
                Ok(())
            }
        }

        let result = layout_document("text", &mut FailingSurface, &LayoutOptions::default());
        assert!(matches!(result, Err(crate::Error::UnsupportedFont(_))));

        // Blank-only documents never touch the font
        assert!(layout_document("\n\n", &mut FailingSurface, &LayoutOptions::default()).is_ok());
    }
}
