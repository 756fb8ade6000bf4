//! Inline markup tokenizer.
//!
//! A body line is scanned once, left to right, into [`Run`]s. Recognized
//! markers:
//!
//! - `**bold**` (closed by the next `**`, may be empty)
//! - `*italic*` (closed by the next lone `*`, never across a bold pair)
//! - `` `code` `` (closed by the next backtick)
//! - `[text](url)` (text up to the first `](`, url up to the next `)`)
//!
//! Run contents are literal: markers inside a run are not re-scanned. An
//! opener without a closer is kept as literal text, except that an
//! unterminated `**` is retried as an (empty) italic pair.

/// A contiguous piece of a line with one kind of inline markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run<'a> {
    /// Unmarked text
    Plain(&'a str),
    /// Text between `**` delimiters
    Bold(&'a str),
    /// Text between `*` delimiters
    Italic(&'a str),
    /// Text between backticks
    Code(&'a str),
    /// `[text](url)` link
    Link {
        /// Link label
        text: &'a str,
        /// Link target
        url: &'a str,
    },
}

impl<'a> Run<'a> {
    /// Visible text of the run, with markup removed.
    pub fn text(&self) -> &'a str {
        match *self {
            Run::Plain(s) | Run::Bold(s) | Run::Italic(s) | Run::Code(s) => s,
            Run::Link { text, .. } => text,
        }
    }

    /// Check if the run is drawn in bold weight.
    pub fn is_bold(&self) -> bool {
        matches!(self, Run::Bold(_))
    }
}

/// A piece of text drawn in a single weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Text to draw
    pub text: String,
    /// Whether the text is drawn bold
    pub bold: bool,
}

impl Span {
    fn normal(text: String) -> Self {
        Self { text, bold: false }
    }

    fn bold(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: true,
        }
    }
}

/// Tokenize a line into inline runs.
pub fn tokenize(line: &str) -> Vec<Run<'_>> {
    let bytes = line.as_bytes();
    let mut runs = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let matched = match bytes[i] {
            b'*' => match_bold(line, i).or_else(|| match_italic(line, i)),
            b'`' => match_code(line, i),
            b'[' => match_link(line, i),
            _ => None,
        };

        match matched {
            Some((run, end)) => {
                if plain_start < i {
                    runs.push(Run::Plain(&line[plain_start..i]));
                }
                runs.push(run);
                i = end;
                plain_start = end;
            }
            None => i += 1,
        }
    }

    if plain_start < line.len() {
        runs.push(Run::Plain(&line[plain_start..]));
    }

    runs
}

/// `**...**` starting at `start`.
fn match_bold(line: &str, start: usize) -> Option<(Run<'_>, usize)> {
    if !line[start..].starts_with("**") {
        return None;
    }
    let inner = start + 2;
    let close = line[inner..].find("**")? + inner;
    Some((Run::Bold(&line[inner..close]), close + 2))
}

/// `` `...` `` starting at `start`.
fn match_code(line: &str, start: usize) -> Option<(Run<'_>, usize)> {
    let inner = start + 1;
    let close = line[inner..].find('`')? + inner;
    Some((Run::Code(&line[inner..close]), close + 1))
}

/// `*...*` starting at `start`.
///
/// The closer must be a lone `*`. An italic run never spans a `**` that
/// opens a terminated bold pair, so `2 * 3 = **6**` keeps its bold run.
fn match_italic(line: &str, start: usize) -> Option<(Run<'_>, usize)> {
    let bytes = line.as_bytes();
    let inner = start + 1;
    let mut c = inner;

    while c < bytes.len() {
        if bytes[c] == b'*' {
            if bytes.get(c + 1) == Some(&b'*') {
                if line[c + 2..].contains("**") {
                    return None;
                }
                c += 2;
                continue;
            }
            if c == inner || bytes[c - 1] != b'*' {
                return Some((Run::Italic(&line[inner..c]), c + 1));
            }
        }
        c += 1;
    }

    None
}

/// `[text](url)` starting at `start`.
fn match_link(line: &str, start: usize) -> Option<(Run<'_>, usize)> {
    let text_start = start + 1;
    let text_end = line[text_start..].find("](")? + text_start;
    let url_start = text_end + 2;
    let url_end = line[url_start..].find(')')? + url_start;
    Some((
        Run::Link {
            text: &line[text_start..text_end],
            url: &line[url_start..url_end],
        },
        url_end + 1,
    ))
}

/// Check if any run is bold.
pub fn has_bold(runs: &[Run<'_>]) -> bool {
    runs.iter().any(Run::is_bold)
}

/// Concatenate the visible text of all runs.
pub fn plain_text(runs: &[Run<'_>]) -> String {
    runs.iter().map(Run::text).collect()
}

/// Remove italic, code and link markup from a line.
///
/// ```
/// use mdstudio::markdown::strip_markup;
///
/// assert_eq!(strip_markup("*a* `b` [c](d)"), "a b c");
/// ```
pub fn strip_markup(line: &str) -> String {
    plain_text(&tokenize(line))
}

/// Group runs into weighted spans for mixed-weight drawing.
///
/// Consecutive non-bold runs merge into one normal span. Empty normal spans
/// are dropped; bold spans are kept even when empty.
pub fn spans(runs: &[Run<'_>]) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut pending = String::new();

    for run in runs {
        if run.is_bold() {
            if !pending.is_empty() {
                spans.push(Span::normal(std::mem::take(&mut pending)));
            }
            spans.push(Span::bold(run.text()));
        } else {
            pending.push_str(run.text());
        }
    }

    if !pending.is_empty() {
        spans.push(Span::normal(pending));
    }

    spans
}
