//! Integration tests for the exporter registry and output formats.

use std::sync::Arc;

use mdstudio::error::{Error, Result};
use mdstudio::export::{DocumentExporter, ExportOptions, ExportResult, ExporterRegistry};
use mdstudio::{export_pdf, FontFamily, MdStudio, PageSize};

/// Mock exporter for testing.
struct MockExporter {
    extensions: Vec<&'static str>,
    name: &'static str,
}

impl MockExporter {
    fn new(extensions: Vec<&'static str>, name: &'static str) -> Self {
        Self { extensions, name }
    }
}

impl DocumentExporter for MockExporter {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn export(&self, content: &str, options: &ExportOptions) -> Result<ExportResult> {
        Ok(ExportResult::new(
            format!("{} by {}", content, self.name).into_bytes(),
            format!("{}.txt", options.stem()),
            "text/plain",
        ))
    }
}

#[test]
fn test_registry_new_is_empty() {
    let registry = ExporterRegistry::new();
    assert!(registry.supported_extensions().is_empty());
    assert!(!registry.supports("pdf"));
}

#[test]
fn test_registry_custom_exporter() {
    let mut registry = ExporterRegistry::new();
    registry.register(Arc::new(MockExporter::new(vec!["txt", "text"], "mock")));

    assert!(registry.supports("TXT"));
    assert_eq!(registry.supported_extensions(), vec!["text", "txt"]);

    let result = registry
        .export("hello", "txt", &ExportOptions::new().with_filename("out"))
        .unwrap();
    assert_eq!(result.bytes, b"hello by mock");
    assert_eq!(result.filename, "out.txt");
}

#[test]
fn test_registry_override_extension() {
    let mut registry = ExporterRegistry::with_defaults();
    registry.register(Arc::new(MockExporter::new(vec!["md"], "override")));

    assert_eq!(registry.get_by_extension("md").unwrap().name(), "override");
    assert_eq!(registry.get_by_extension("markdown").unwrap().name(), "markdown");
}

#[test]
fn test_unsupported_format() {
    let result = ExporterRegistry::with_defaults().export("x", "docx", &ExportOptions::default());
    assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
}

#[test]
fn test_builder_with_custom_exporter() {
    let studio = MdStudio::new().with_exporter(Arc::new(MockExporter::new(vec!["txt"], "mock")));
    let result = studio.export("body", "txt").unwrap();
    assert_eq!(result.filename, "document.txt");
}

// ==================== PDF ====================

#[test]
fn test_pdf_is_loadable_with_expected_pages() {
    let content = "# Long\n\n".to_string() + &"Some paragraph text.\n".repeat(70);
    let result = MdStudio::new().export(&content, "pdf").unwrap();

    let doc = lopdf::Document::load_mem(&result.bytes).unwrap();
    let stats = result.stats.unwrap();
    assert!(stats.page_count >= 2);
    assert_eq!(doc.get_pages().len() as u32, stats.page_count);
}

#[test]
fn test_pdf_byte_identical() {
    let content = "# Title\n\nSome **bold** and normal text.";
    let options = ExportOptions::new().with_title("Fixed");
    let registry = ExporterRegistry::with_defaults();

    let first = registry.export(content, "pdf", &options).unwrap();
    let second = registry.export(content, "pdf", &options).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_pdf_letter_media_box() {
    let result = MdStudio::new()
        .with_page_size(PageSize::Letter)
        .with_font_family(FontFamily::Courier)
        .export("Hello", "pdf")
        .unwrap();

    let doc = lopdf::Document::load_mem(&result.bytes).unwrap();
    let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    let width = media_box[2].as_float().unwrap();
    assert!((width - 612.0).abs() < 0.5);
}

#[test]
fn test_export_pdf_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("report");

    let path = export_pdf("# Report", target.to_str().unwrap()).unwrap();
    assert_eq!(path, dir.path().join("report.pdf"));
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF-"));
}

// ==================== HTML / Markdown ====================

#[test]
fn test_html_export() {
    let result = MdStudio::new()
        .with_filename("notes.md")
        .export("# Notes\n**b** <i>", "html")
        .unwrap();
    let html = String::from_utf8(result.bytes).unwrap();

    assert_eq!(result.filename, "notes.html");
    assert!(html.contains("<title>notes</title>"));
    assert!(html.contains("<h1>Notes</h1><br>"));
    assert!(html.contains("<strong>b</strong> &lt;i&gt;"));
}

#[test]
fn test_markdown_export_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let result = MdStudio::new()
        .with_filename("draft")
        .export("# Draft\r\n", "markdown")
        .unwrap();
    let path = result.save_to_dir(dir.path()).unwrap();

    assert_eq!(path.file_name().unwrap(), "draft.md");
    assert_eq!(std::fs::read(path).unwrap(), b"# Draft\r\n");
}
