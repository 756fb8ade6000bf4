//! Inline span rendering for body lines.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::markdown::{has_bold, plain_text, spans, tokenize};
use crate::surface::{FontWeight, OutputSurface};

use super::{Cursor, LayoutOptions};

/// Which rendering path a body line took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPath {
    /// Mixed-weight runs on one visual line
    Bold,
    /// Markup stripped and word-wrapped
    Plain,
}

/// Result of drawing one body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyOutcome {
    /// Path taken
    pub path: BodyPath,
    /// Number of visual lines drawn
    pub visual_lines: usize,
}

/// Draw one body line starting at `cursor`.
///
/// The vertical cursor is left to the caller, which advances it from the
/// returned visual line count.
pub fn render_body_line(
    surface: &mut dyn OutputSurface,
    text: &str,
    cursor: Cursor,
    options: &LayoutOptions,
) -> Result<BodyOutcome> {
    let runs = tokenize(text);
    let size = options.body_font_size;

    if has_bold(&runs) {
        let mut x = cursor.x;
        for span in spans(&runs) {
            let weight = if span.bold {
                FontWeight::Bold
            } else {
                FontWeight::Normal
            };
            surface.set_font(weight, size)?;
            surface.draw_text(&span.text, x, cursor.y)?;
            x += surface.measure_text_width(&span.text)?;
        }

        // Bold-containing lines are never wrapped
        return Ok(BodyOutcome {
            path: BodyPath::Bold,
            visual_lines: 1,
        });
    }

    surface.set_font(FontWeight::Normal, size)?;
    let visual_lines = surface.wrap_text(&plain_text(&runs), options.wrap_width)?;
    for (i, line) in visual_lines.iter().enumerate() {
        if !line.is_empty() {
            let y = cursor.y + i as f32 * options.body_line_height;
            surface.draw_text(line, cursor.x, y)?;
        }
    }

    Ok(BodyOutcome {
        path: BodyPath::Plain,
        visual_lines: visual_lines.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawInstruction, RecordingSurface};

    fn render(text: &str) -> (BodyOutcome, Vec<DrawInstruction>) {
        let mut surface = RecordingSurface::new();
        let outcome = render_body_line(
            &mut surface,
            text,
            Cursor::new(20.0, 40.0),
            &LayoutOptions::default(),
        )
        .unwrap();
        (outcome, surface.into_instructions())
    }

    fn text_of(instruction: &DrawInstruction) -> (&str, f32, FontWeight) {
        match instruction {
            DrawInstruction::Text { text, x, weight, .. } => (text.as_str(), *x, *weight),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_single_bold_span_three_draws() {
        let (outcome, instructions) = render("pre **x** post");
        assert_eq!(outcome.path, BodyPath::Bold);
        assert_eq!(outcome.visual_lines, 1);
        assert_eq!(instructions.len(), 3);

        let (pre, pre_x, pre_weight) = text_of(&instructions[0]);
        let (bold, bold_x, bold_weight) = text_of(&instructions[1]);
        let (post, post_x, post_weight) = text_of(&instructions[2]);

        assert_eq!((pre, pre_weight), ("pre ", FontWeight::Normal));
        assert_eq!((bold, bold_weight), ("x", FontWeight::Bold));
        assert_eq!((post, post_weight), (" post", FontWeight::Normal));

        assert_eq!(pre_x, 20.0);
        assert!(bold_x > pre_x);
        assert!(post_x > bold_x);
    }

    #[test]
    fn test_stray_star_keeps_bold_path() {
        let (outcome, instructions) = render("2 * 3 = **6**");
        assert_eq!(outcome.path, BodyPath::Bold);
        let drawn: Vec<_> = instructions.iter().map(text_of).collect();
        assert_eq!(drawn.len(), 2);
        assert_eq!((drawn[0].0, drawn[0].2), ("2 * 3 = ", FontWeight::Normal));
        assert_eq!((drawn[1].0, drawn[1].2), ("6", FontWeight::Bold));

        let (outcome, instructions) = render("a*b **c**");
        assert_eq!(outcome.path, BodyPath::Bold);
        assert_eq!(text_of(&instructions[0]).0, "a*b ");
        assert_eq!(text_of(&instructions[1]).0, "c");
    }

    #[test]
    fn test_horizontal_cursor_tracks_measured_width() {
        let mut surface = RecordingSurface::new();
        surface.set_font(FontWeight::Normal, 11.0).unwrap();
        let pre_width = surface.measure_text_width("ab ").unwrap();

        let (_, instructions) = render("ab **cd**");
        let (_, bold_x, _) = text_of(&instructions[1]);
        assert!((bold_x - (20.0 + pre_width)).abs() < 1e-4);
    }

    #[test]
    fn test_bold_at_line_edges_omits_empty_text() {
        let (_, instructions) = render("**only**");
        assert_eq!(instructions.len(), 1);
        assert_eq!(text_of(&instructions[0]).0, "only");
    }

    #[test]
    fn test_bold_line_stays_on_one_baseline() {
        let long = format!("**start** {}", "word ".repeat(80));
        let (outcome, instructions) = render(&long);
        assert_eq!(outcome.visual_lines, 1);
        assert!(instructions.iter().all(|i| matches!(
            i,
            DrawInstruction::Text { y, .. } if *y == 40.0
        )));
    }

    #[test]
    fn test_plain_path_strips_markup() {
        let (outcome, instructions) = render("*a* `b` [c](d)");
        assert_eq!(outcome.path, BodyPath::Plain);
        assert_eq!(outcome.visual_lines, 1);
        assert_eq!(text_of(&instructions[0]).0, "a b c");
    }

    #[test]
    fn test_plain_path_wraps() {
        let long = "lorem ipsum ".repeat(20);
        let (outcome, instructions) = render(long.trim_end());
        assert!(outcome.visual_lines > 1);
        assert_eq!(instructions.len(), outcome.visual_lines);

        for (i, instruction) in instructions.iter().enumerate() {
            match instruction {
                DrawInstruction::Text { x, y, .. } => {
                    assert_eq!(*x, 20.0);
                    assert!((y - (40.0 + 6.0 * i as f32)).abs() < 1e-4);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_unterminated_bold_renders_plain() {
        let (outcome, instructions) = render("**text");
        assert_eq!(outcome.path, BodyPath::Plain);
        assert_eq!(text_of(&instructions[0]).0, "text");
    }

    #[test]
    fn test_markup_only_line_draws_nothing() {
        let (outcome, instructions) = render("**");
        assert_eq!(outcome.path, BodyPath::Plain);
        assert_eq!(outcome.visual_lines, 1);
        assert!(instructions.is_empty());
    }
}
