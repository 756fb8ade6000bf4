//! Line-oriented markdown recognition used by the exporters.

mod inline;
mod line;

pub use inline::{has_bold, plain_text, spans, strip_markup, tokenize, Run, Span};
pub use line::{classify, lines, split_lines, Line, LineKind};
