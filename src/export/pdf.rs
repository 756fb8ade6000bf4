//! PDF exporter.

use std::path::PathBuf;

use crate::error::Result;
use crate::layout::{layout_document, LayoutStats};
use crate::surface::{OutputSurface, PdfInfo, PdfSurface};

use super::{DocumentExporter, ExportOptions, ExportResult};

/// Exports markdown as a paginated PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter;

impl PdfExporter {
    /// Create a new PDF exporter.
    pub fn new() -> Self {
        Self
    }

    /// Lay out `content` onto a fresh PDF surface.
    pub fn render(&self, content: &str, options: &ExportOptions) -> Result<(PdfSurface, LayoutStats)> {
        let info = PdfInfo {
            title: Some(options.effective_title()),
            producer: Some(concat!("mdstudio ", env!("CARGO_PKG_VERSION")).to_string()),
            creation_date: options.creation_date,
        };
        let mut surface = PdfSurface::new(options.layout.page_size)
            .with_family(options.font_family)
            .with_info(info)
            .with_compression(options.compress);

        let stats = layout_document(content, &mut surface, &options.layout)?;
        Ok((surface, stats))
    }

    /// Lay out `content` and save it as `<stem>.pdf`.
    pub fn export_to_file(&self, content: &str, options: &ExportOptions) -> Result<PathBuf> {
        let (mut surface, stats) = self.render(content, options)?;
        let filename = format!("{}.pdf", options.stem());
        surface.save(&filename)?;
        log::info!("Exported {} page(s) to {}", stats.page_count, filename);
        Ok(PathBuf::from(filename))
    }
}

impl DocumentExporter for PdfExporter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn export(&self, content: &str, options: &ExportOptions) -> Result<ExportResult> {
        let (surface, stats) = self.render(content, options)?;
        let bytes = surface.to_bytes()?;
        let filename = format!("{}.pdf", options.stem());
        Ok(ExportResult::new(bytes, filename, "application/pdf").with_stats(stats))
    }
}
