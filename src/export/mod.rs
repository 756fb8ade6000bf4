//! Document exporters with a registry keyed by file extension.
//!
//! # Example
//!
//! ```no_run
//! use mdstudio::export::{ExportOptions, ExporterRegistry};
//!
//! fn main() -> mdstudio::Result<()> {
//!     let registry = ExporterRegistry::with_defaults();
//!     let result = registry.export("# Notes\n\nHello", "pdf", &ExportOptions::default())?;
//!     let path = result.save_to_dir(".")?;
//!     println!("wrote {}", path.display());
//!     Ok(())
//! }
//! ```

mod html;
mod markdown;
mod pdf;

pub use html::{to_html, HtmlExporter};
pub use markdown::MarkdownExporter;
pub use pdf::PdfExporter;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::layout::{LayoutOptions, LayoutStats};
use crate::surface::FontFamily;

/// Default output filename stem.
pub const DEFAULT_FILENAME: &str = "document";

/// Options for exporting a document.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Page layout (PDF only)
    pub layout: LayoutOptions,

    /// Font family (PDF only)
    pub font_family: FontFamily,

    /// Output filename, with or without extension
    pub filename: String,

    /// Document title; defaults to the filename stem
    pub title: Option<String>,

    /// Creation timestamp written into the PDF info dictionary.
    /// Leave unset for byte-reproducible output.
    pub creation_date: Option<DateTime<Utc>>,

    /// Compress PDF content streams
    pub compress: bool,
}

impl ExportOptions {
    /// Create new export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Set the output filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the creation timestamp.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Enable or disable content stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Filename with any known export extension removed.
    pub fn stem(&self) -> &str {
        let name = self.filename.trim();
        if name.is_empty() {
            return DEFAULT_FILENAME;
        }
        match name.rsplit_once('.') {
            Some((stem, ext))
                if !stem.is_empty()
                    && matches!(
                        ext.to_ascii_lowercase().as_str(),
                        "pdf" | "md" | "markdown" | "html" | "htm"
                    ) =>
            {
                stem
            }
            _ => name,
        }
    }

    /// Title to embed: the explicit title, else the filename stem.
    pub fn effective_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.stem().to_string())
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            font_family: FontFamily::default(),
            filename: DEFAULT_FILENAME.to_string(),
            title: None,
            creation_date: None,
            compress: true,
        }
    }
}

/// Result of exporting a document.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Encoded output
    pub bytes: Vec<u8>,

    /// Output filename including extension
    pub filename: String,

    /// MIME type of the output
    pub mime_type: &'static str,

    /// Layout statistics (PDF only)
    pub stats: Option<LayoutStats>,
}

impl ExportResult {
    /// Create a new export result.
    pub fn new(bytes: Vec<u8>, filename: String, mime_type: &'static str) -> Self {
        Self {
            bytes,
            filename,
            mime_type,
            stats: None,
        }
    }

    /// Set layout statistics.
    pub fn with_stats(mut self, stats: LayoutStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Output length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the output is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the output into `dir` under its filename.
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Trait for document exporters.
///
/// Implement this trait to add a new output format.
pub trait DocumentExporter: Send + Sync {
    /// Supported file extensions, lowercase without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Name of this exporter.
    fn name(&self) -> &str;

    /// Export markdown `content`.
    fn export(&self, content: &str, options: &ExportOptions) -> Result<ExportResult>;

    /// Check if this exporter produces the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry mapping extensions and names to exporters.
pub struct ExporterRegistry {
    exporters: HashMap<String, Arc<dyn DocumentExporter>>,
    by_name: HashMap<String, Arc<dyn DocumentExporter>>,
}

impl ExporterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            exporters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF, Markdown and HTML exporters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExporter::new()));
        registry.register(Arc::new(MarkdownExporter::new()));
        registry.register(Arc::new(HtmlExporter::new()));
        registry
    }

    /// Register an exporter for all its extensions.
    pub fn register(&mut self, exporter: Arc<dyn DocumentExporter>) {
        for ext in exporter.supported_extensions() {
            self.exporters.insert(ext.to_lowercase(), exporter.clone());
        }
        self.by_name.insert(exporter.name().to_lowercase(), exporter);
    }

    /// Get an exporter by extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentExporter>> {
        self.exporters.get(&ext.to_lowercase()).cloned()
    }

    /// Get an exporter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentExporter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.exporters.contains_key(&ext.to_lowercase())
    }

    /// All supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.exporters.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Export `content` with the exporter registered for `ext`.
    pub fn export(&self, content: &str, ext: &str, options: &ExportOptions) -> Result<ExportResult> {
        let exporter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))?;

        log::debug!("Exporting with {} exporter", exporter.name());
        exporter.export(content, options)
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
