//! Text editing operations behind the editor toolbar and assistant insertion.
//!
//! All offsets are byte offsets into the content. Offsets past the end are
//! clamped to the content length and offsets inside a multi-byte character
//! are moved back to the start of that character.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Result of an edit: the new content and the selection to restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Content after the edit
    pub content: String,
    /// Selection after the edit; empty for a caret
    pub selection: Range<usize>,
}

impl Edit {
    /// Caret position (the end of the selection).
    pub fn cursor(&self) -> usize {
        self.selection.end
    }
}

/// Markup inserted by the toolbar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarAction {
    /// `**text**`
    Bold,
    /// `*text*`
    Italic,
    /// `## ` before the selection
    Heading,
    /// `[text](url)`
    Link,
    /// `` `text` ``
    Code,
}

impl ToolbarAction {
    /// All toolbar actions in button order.
    pub const ALL: [ToolbarAction; 5] = [
        ToolbarAction::Bold,
        ToolbarAction::Italic,
        ToolbarAction::Heading,
        ToolbarAction::Link,
        ToolbarAction::Code,
    ];

    /// Text inserted before and after the selection.
    pub fn markers(self) -> (&'static str, &'static str) {
        match self {
            ToolbarAction::Bold => ("**", "**"),
            ToolbarAction::Italic => ("*", "*"),
            ToolbarAction::Heading => ("## ", ""),
            ToolbarAction::Link => ("[", "](url)"),
            ToolbarAction::Code => ("`", "`"),
        }
    }

    /// Parse an action name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bold" => Some(ToolbarAction::Bold),
            "italic" => Some(ToolbarAction::Italic),
            "heading" => Some(ToolbarAction::Heading),
            "link" => Some(ToolbarAction::Link),
            "code" => Some(ToolbarAction::Code),
            _ => None,
        }
    }

    /// Apply this action to the selected range of `content`.
    pub fn apply(self, content: &str, selection: Range<usize>) -> Edit {
        let (before, after) = self.markers();
        wrap_selection(content, selection, before, after)
    }
}

/// Surround the selected text with `before` and `after`.
///
/// The returned selection covers the originally selected text inside the
/// inserted markers. A reversed range is treated as its normalized form.
pub fn wrap_selection(content: &str, selection: Range<usize>, before: &str, after: &str) -> Edit {
    let (start, end) = normalize(content, selection);
    let selected = &content[start..end];

    let mut out = String::with_capacity(content.len() + before.len() + after.len());
    out.push_str(&content[..start]);
    out.push_str(before);
    out.push_str(selected);
    out.push_str(after);
    out.push_str(&content[end..]);

    let new_start = start + before.len();
    Edit {
        content: out,
        selection: new_start..new_start + selected.len(),
    }
}

/// Insert `text` at the caret, or append it after a blank line when there
/// is no caret.
///
/// The returned selection is a caret placed after the inserted text.
pub fn insert_at_cursor(content: &str, cursor: Option<usize>, text: &str) -> Edit {
    match cursor {
        Some(offset) => {
            let at = clamp_to_char_boundary(content, offset);
            let mut out = String::with_capacity(content.len() + text.len());
            out.push_str(&content[..at]);
            out.push_str(text);
            out.push_str(&content[at..]);
            let caret = at + text.len();
            Edit {
                content: out,
                selection: caret..caret,
            }
        }
        None => {
            let out = format!("{}\n\n{}", content, text);
            let caret = out.len();
            Edit {
                content: out,
                selection: caret..caret,
            }
        }
    }
}

/// Linear undo history of content snapshots.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    position: usize,
}

impl History {
    /// Start a history at `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            position: 0,
        }
    }

    /// Current snapshot.
    pub fn current(&self) -> &str {
        &self.entries[self.position]
    }

    /// Record a new snapshot, discarding anything that was undone.
    pub fn push(&mut self, content: impl Into<String>) {
        let content = content.into();
        if content == self.current() {
            return;
        }
        self.entries.truncate(self.position + 1);
        self.entries.push(content);
        self.position += 1;
    }

    /// Step back one snapshot.
    pub fn undo(&mut self) -> Option<&str> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(self.current())
    }

    /// Step forward one snapshot.
    pub fn redo(&mut self) -> Option<&str> {
        if self.position + 1 >= self.entries.len() {
            return None;
        }
        self.position += 1;
        Some(self.current())
    }

    /// Check if there is an earlier snapshot.
    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    /// Check if an undone snapshot can be restored.
    pub fn can_redo(&self) -> bool {
        self.position + 1 < self.entries.len()
    }
}

fn normalize(content: &str, selection: Range<usize>) -> (usize, usize) {
    let a = clamp_to_char_boundary(content, selection.start);
    let b = clamp_to_char_boundary(content, selection.end);
    (a.min(b), a.max(b))
}

fn clamp_to_char_boundary(content: &str, offset: usize) -> usize {
    let mut offset = offset.min(content.len());
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
