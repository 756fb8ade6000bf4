//! Line splitting and prefix classification.

use serde::{Deserialize, Serialize};

/// Markdown construct of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// `# ` prefix
    Heading1,
    /// `## ` prefix
    Heading2,
    /// `### ` prefix
    Heading3,
    /// Empty or whitespace-only line
    Blank,
    /// Anything else
    Body,
}

/// Heading prefixes in test order. The first match wins.
const HEADING_PREFIXES: [(&str, LineKind); 3] = [
    ("# ", LineKind::Heading1),
    ("## ", LineKind::Heading2),
    ("### ", LineKind::Heading3),
];

impl LineKind {
    /// Heading level (1-3), or `None` for blank and body lines.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            LineKind::Heading1 => Some(1),
            LineKind::Heading2 => Some(2),
            LineKind::Heading3 => Some(3),
            LineKind::Blank | LineKind::Body => None,
        }
    }

    /// Check if this is one of the heading kinds.
    pub fn is_heading(self) -> bool {
        self.heading_level().is_some()
    }

    /// The literal prefix that selects this kind, if any.
    pub fn prefix(self) -> Option<&'static str> {
        HEADING_PREFIXES
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(prefix, _)| *prefix)
    }
}

/// A classified source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Zero-based index of the line in the document
    pub index: usize,
    /// Line text without the trailing `\r` of a CRLF ending
    pub text: &'a str,
    /// Classification of the line
    pub kind: LineKind,
}

impl<'a> Line<'a> {
    /// Classify a raw line.
    pub fn new(index: usize, raw: &'a str) -> Self {
        let text = raw.strip_suffix('\r').unwrap_or(raw);
        Self {
            index,
            text,
            kind: classify(text),
        }
    }

    /// Text to draw for this line.
    ///
    /// Headings lose exactly their matched prefix; other lines are returned
    /// unchanged.
    pub fn content(&self) -> &'a str {
        match self.kind.prefix() {
            Some(prefix) => self.text.strip_prefix(prefix).unwrap_or(self.text),
            None => self.text,
        }
    }
}

/// Classify a single line by its leading characters.
pub fn classify(line: &str) -> LineKind {
    for (prefix, kind) in HEADING_PREFIXES {
        if line.starts_with(prefix) {
            return kind;
        }
    }

    if line.trim().is_empty() {
        LineKind::Blank
    } else {
        LineKind::Body
    }
}

/// Split a document into lines on `\n`.
///
/// Empty fragments (including a trailing one) are kept, so joining the
/// result with `\n` reproduces the input.
pub fn split_lines(document: &str) -> impl Iterator<Item = &str> {
    document.split('\n')
}

/// Split and classify every line of a document.
pub fn lines(document: &str) -> impl Iterator<Item = Line<'_>> {
    split_lines(document)
        .enumerate()
        .map(|(index, raw)| Line::new(index, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_is_lossless() {
        let docs = [
            "",
            "\n",
            "# Title\n\nbody",
            "trailing\n\n",
            "a\r\nb\r\n",
            "no newline",
        ];
        for doc in docs {
            let joined = split_lines(doc).collect::<Vec<_>>().join("\n");
            assert_eq!(joined, doc);
        }
    }

    #[test]
    fn test_trailing_fragments_are_blank_lines() {
        let kinds: Vec<_> = lines("text\n\n").map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Body, LineKind::Blank, LineKind::Blank]);
    }

    #[test]
    fn test_classify_headings() {
        assert_eq!(classify("# One"), LineKind::Heading1);
        assert_eq!(classify("## Two"), LineKind::Heading2);
        assert_eq!(classify("### Three"), LineKind::Heading3);
        assert_eq!(classify("#### Four"), LineKind::Body);
        assert_eq!(classify("#NoSpace"), LineKind::Body);
        assert_eq!(classify(" # indented"), LineKind::Body);
    }

    #[test]
    fn test_classify_blank() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("   \t "), LineKind::Blank);
        assert_eq!(classify("x"), LineKind::Body);
    }

    #[test]
    fn test_heading_prefix_is_exactly_one_class() {
        for (line, expected) in [
            ("# a", LineKind::Heading1),
            ("## a", LineKind::Heading2),
            ("### a", LineKind::Heading3),
        ] {
            let matching: Vec<_> = HEADING_PREFIXES
                .iter()
                .filter(|(prefix, _)| line.starts_with(prefix))
                .collect();
            assert_eq!(matching.len(), 1);
            assert_eq!(classify(line), expected);
        }
    }

    #[test]
    fn test_content_strips_exact_prefix() {
        assert_eq!(Line::new(0, "# Title").content(), "Title");
        assert_eq!(Line::new(0, "##  Spaced").content(), " Spaced");
        assert_eq!(Line::new(0, "### # nested").content(), "# nested");
        assert_eq!(Line::new(0, "plain # text").content(), "plain # text");
    }

    #[test]
    fn test_crlf_is_trimmed() {
        let line = Line::new(3, "# Title\r");
        assert_eq!(line.kind, LineKind::Heading1);
        assert_eq!(line.content(), "Title");
        assert_eq!(line.index, 3);
        assert_eq!(Line::new(0, "\r").kind, LineKind::Blank);
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(LineKind::Heading2.heading_level(), Some(2));
        assert!(!LineKind::Body.is_heading());
        assert_eq!(LineKind::Heading3.prefix(), Some("### "));
        assert_eq!(LineKind::Blank.prefix(), None);
    }
}
