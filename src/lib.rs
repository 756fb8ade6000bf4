//! # mdstudio
//!
//! Document back end for a markdown writing studio.
//!
//! The core of the crate is a small markdown-to-PDF exporter: the document
//! is walked line by line, headings and body lines are drawn onto an
//! [`OutputSurface`] with a manually tracked cursor, bold spans are drawn
//! as mixed-weight runs and pages break when the cursor leaves the
//! printable area.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mdstudio::export_pdf;
//!
//! fn main() -> mdstudio::Result<()> {
//!     let path = export_pdf("# Notes\n\nSome **bold** text.", "notes")?;
//!     println!("wrote {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **PDF export**: A4 pagination, heading styles, bold runs, word wrap
//! - **Other formats**: Markdown passthrough and standalone HTML
//! - **Pluggable surfaces**: lay out onto PDF or record draw instructions
//! - **Editor operations**: toolbar markup wrapping, cursor insertion, undo
//! - **Settings**: obfuscated local settings store

pub mod editor;
pub mod error;
pub mod export;
pub mod layout;
pub mod markdown;
pub mod settings;
pub mod surface;

// Re-export commonly used types
pub use editor::{insert_at_cursor, wrap_selection, Edit, History, ToolbarAction};
pub use error::{Error, Result};
pub use export::{
    to_html, DocumentExporter, ExportOptions, ExportResult, ExporterRegistry, HtmlExporter,
    MarkdownExporter, PdfExporter,
};
pub use layout::{layout_document, AdvancePolicy, LayoutOptions, LayoutStats};
pub use markdown::{classify, strip_markup, LineKind};
pub use settings::{validate_api_key, Settings, SettingsStore};
pub use surface::{
    DrawInstruction, FontFamily, FontWeight, OutputSurface, PageSize, PdfSurface,
    RecordingSurface,
};

use std::path::PathBuf;

/// Export markdown to a PDF file named after `filename`.
///
/// The `.pdf` extension is appended to a bare stem; an empty filename
/// writes `document.pdf`.
///
/// # Example
///
/// ```no_run
/// use mdstudio::export_pdf;
///
/// let path = export_pdf("# Report", "report.pdf").unwrap();
/// assert_eq!(path.to_str(), Some("report.pdf"));
/// ```
pub fn export_pdf(content: &str, filename: &str) -> Result<PathBuf> {
    let options = ExportOptions::new().with_filename(filename);
    PdfExporter::new().export_to_file(content, &options)
}

/// Render markdown to PDF bytes with default options.
pub fn to_pdf_bytes(content: &str) -> Result<Vec<u8>> {
    let result = PdfExporter::new().export(content, &ExportOptions::default())?;
    Ok(result.bytes)
}

/// Lay out markdown and return the draw instructions it produces.
///
/// # Example
///
/// ```
/// use mdstudio::layout_instructions;
///
/// let instructions = layout_instructions("# Title").unwrap();
/// assert_eq!(instructions[0].text(), Some("Title"));
/// ```
pub fn layout_instructions(content: &str) -> Result<Vec<DrawInstruction>> {
    let mut surface = RecordingSurface::new();
    layout_document(content, &mut surface, &LayoutOptions::default())?;
    Ok(surface.into_instructions())
}

/// Builder for exporting markdown documents.
///
/// # Example
///
/// ```no_run
/// use mdstudio::{MdStudio, FontFamily, PageSize};
///
/// let result = MdStudio::new()
///     .with_page_size(PageSize::Letter)
///     .with_font_family(FontFamily::Courier)
///     .with_filename("letter")
///     .export("# Dear reader", "pdf")?;
/// result.save_to_dir(".")?;
/// # Ok::<(), mdstudio::Error>(())
/// ```
pub struct MdStudio {
    options: ExportOptions,
    registry: ExporterRegistry,
}

impl MdStudio {
    /// Create a new builder with the default exporters.
    pub fn new() -> Self {
        Self {
            options: ExportOptions::default(),
            registry: ExporterRegistry::with_defaults(),
        }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.options.layout = self.options.layout.with_page_size(page_size);
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.options = self.options.with_font_family(family);
        self
    }

    /// Set the body advance policy.
    pub fn with_advance_policy(mut self, policy: AdvancePolicy) -> Self {
        self.options.layout = self.options.layout.with_advance_policy(policy);
        self
    }

    /// Set the output filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.options = self.options.with_filename(filename);
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Set the full layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.options = self.options.with_layout(layout);
        self
    }

    /// Register an additional exporter.
    pub fn with_exporter(mut self, exporter: std::sync::Arc<dyn DocumentExporter>) -> Self {
        self.registry.register(exporter);
        self
    }

    /// Current export options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export `content` in the format registered for `ext`.
    pub fn export(&self, content: &str, ext: &str) -> Result<ExportResult> {
        self.registry.export(content, ext, &self.options)
    }

    /// Lay out `content` onto an arbitrary surface.
    pub fn layout(&self, content: &str, surface: &mut dyn OutputSurface) -> Result<LayoutStats> {
        layout_document(content, surface, &self.options.layout)
    }
}

impl Default for MdStudio {
    fn default() -> Self {
        Self::new()
    }
}
