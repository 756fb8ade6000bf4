//! HTML exporter.
//!
//! Markup is translated by ordered substitutions over the escaped source:
//! headings (line anchored, `###` first), bold, italic, code, links, and
//! finally line breaks.

use regex::Regex;

use crate::error::Result;

use super::{DocumentExporter, ExportOptions, ExportResult};

const STYLESHEET: &str = "\
body { font-family: 'Inter', sans-serif; margin: 40px; line-height: 1.6; color: #374151; }
h1, h2, h3 { font-family: 'Inter', sans-serif; font-weight: 600; color: #1f2937; }
h1 { margin: 24px 0 16px 0; }
h2 { margin: 20px 0 12px 0; }
h3 { margin: 16px 0 8px 0; }
strong { font-weight: 600; }
code { font-family: 'Fira Code', monospace; background: #f3f4f6; padding: 2px 6px; border-radius: 4px; }
a { color: #2563eb; text-decoration: underline; }";

/// Exports markdown as a standalone HTML page.
#[derive(Debug, Clone)]
pub struct HtmlExporter {
    rules: Vec<(Regex, &'static str)>,
}

impl HtmlExporter {
    /// Create a new HTML exporter.
    pub fn new() -> Self {
        let rules = [
            (r"(?m)^### (.*)$", "<h3>${1}</h3>"),
            (r"(?m)^## (.*)$", "<h2>${1}</h2>"),
            (r"(?m)^# (.*)$", "<h1>${1}</h1>"),
            (r"\*\*(.*?)\*\*", "<strong>${1}</strong>"),
            (r"\*(.*?)\*", "<em>${1}</em>"),
            (r"`(.*?)`", "<code>${1}</code>"),
            (r"\[(.*?)\]\((.*?)\)", r#"<a href="${2}">${1}</a>"#),
            (r"\n", "<br>\n"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
        .collect();

        Self { rules }
    }

    /// Convert markdown to an HTML fragment.
    pub fn render_body(&self, content: &str) -> String {
        let normalized = content.replace("\r\n", "\n");
        self.rules
            .iter()
            .fold(escape_html(&normalized), |html, (re, replacement)| {
                re.replace_all(&html, *replacement).into_owned()
            })
    }

    /// Convert markdown to a complete HTML document.
    pub fn render(&self, content: &str, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            escape_html(title),
            STYLESHEET,
            self.render_body(content)
        )
    }
}

impl Default for HtmlExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExporter for HtmlExporter {
    fn supported_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn name(&self) -> &str {
        "html"
    }

    fn export(&self, content: &str, options: &ExportOptions) -> Result<ExportResult> {
        let html = self.render(content, &options.effective_title());
        Ok(ExportResult::new(
            html.into_bytes(),
            format!("{}.html", options.stem()),
            "text/html",
        ))
    }
}

/// Convert markdown to a complete HTML document.
pub fn to_html(content: &str, title: &str) -> String {
    HtmlExporter::new().render(content, title)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
