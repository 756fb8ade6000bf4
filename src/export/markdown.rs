//! Markdown exporter.

use crate::error::Result;

use super::{DocumentExporter, ExportOptions, ExportResult};

/// Exports the markdown source unchanged.
#[derive(Debug, Clone, Default)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    /// Create a new Markdown exporter.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExporter for MarkdownExporter {
    fn supported_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn name(&self) -> &str {
        "markdown"
    }

    fn export(&self, content: &str, options: &ExportOptions) -> Result<ExportResult> {
        Ok(ExportResult::new(
            content.as_bytes().to_vec(),
            format!("{}.md", options.stem()),
            "text/markdown",
        ))
    }
}
