//! Page layout for markdown documents.
//!
//! The layout pass is a single fold over the document's lines. Each line is
//! classified, drawn with the font of its class, and the render cursor is
//! advanced; a page break is issued before any line that would start below
//! the printable area.
//!
//! # Example
//!
//! ```
//! use mdstudio::layout::{layout_document, LayoutOptions};
//! use mdstudio::surface::{DrawInstruction, RecordingSurface};
//!
//! fn main() -> mdstudio::Result<()> {
//!     let mut surface = RecordingSurface::new();
//!     layout_document("Some **bold** text", &mut surface, &LayoutOptions::default())?;
//!
//!     assert_eq!(surface.texts(), vec!["Some ", "bold", " text"]);
//!     assert!(matches!(surface.instructions()[1], DrawInstruction::Text { .. }));
//!     Ok(())
//! }
//! ```

mod cursor;
mod options;
mod paginator;
mod spans;

pub use cursor::Cursor;
pub use options::{AdvancePolicy, LayoutOptions, LineStyle};
pub use paginator::{layout_document, LayoutStats, Paginator};
pub use spans::{render_body_line, BodyOutcome, BodyPath};
