// src/utils/html_debug.rs
use std::fs;
use std::path::{Path, PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use crate::utils::error::{AppError, FetchError};
use crate::volby::{District, PageSource};

// Every `headers="..."` attribute; these tag the cells the extractors read.
static HEADERS_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"headers\s*=\s*"([^"]*)""#).expect("Failed to compile HEADERS_ATTR_RE")
});

/// Wraps every `headers` attribute occurrence in a marker span so the cell
/// layout of a page can be inspected in a browser.
pub fn annotate_headers(html: &str) -> (String, usize) {
    let mut annotated = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    annotated.push_str(".cell-key { background-color: #FFFF00; font-family: monospace; }\n");
    annotated.push_str("</style>\n</head>\n<body>\n<pre>\n");

    let mut last_pos = 0;
    let mut count = 0;
    for caps in HEADERS_ATTR_RE.captures_iter(html) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else { continue };
        annotated.push_str(&escape(&html[last_pos..whole.start()]));
        annotated.push_str(&format!("<span class=\"cell-key\" title=\"{}\">", escape(key.as_str())));
        annotated.push_str(&escape(whole.as_str()));
        annotated.push_str("</span>");
        last_pos = whole.end();
        count += 1;
    }
    annotated.push_str(&escape(&html[last_pos..]));
    annotated.push_str("\n</pre>\n</body>\n</html>");

    (annotated, count)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[derive(Serialize)]
struct Manifest<'a> {
    source_url: &'a str,
    captured_at: String,
    district_count: usize,
    districts: &'a [District],
}

/// Saves fetched pages and run details for offline inspection.
pub struct DebugCapture {
    dir: PathBuf,
}

impl DebugCapture {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        tracing::info!("Saving debug captures to {}", dir.display());
        Ok(Self { dir })
    }

    /// Stores a raw page as `<label>.html`.
    pub fn save_page(&self, label: &str, html: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.join(format!("{}.html", sanitize(label)));
        fs::write(&path, html)?;
        tracing::debug!("Saved raw page to {}", path.display());
        Ok(path)
    }

    /// Stores a page with its cell keys highlighted as `<label>_annotated.html`.
    pub fn save_annotated(&self, label: &str, html: &str) -> std::io::Result<PathBuf> {
        let (annotated, count) = annotate_headers(html);
        let path = self.dir.join(format!("{}_annotated.html", sanitize(label)));
        fs::write(&path, annotated)?;
        tracing::debug!("Annotated {} cell keys in {}", count, path.display());
        Ok(path)
    }

    pub fn write_manifest(&self, source_url: &str, districts: &[District]) -> Result<PathBuf, AppError> {
        let manifest = Manifest {
            source_url,
            captured_at: chrono::Utc::now().to_rfc3339(),
            district_count: districts.len(),
            districts,
        };
        let path = self.dir.join("manifest.json");
        fs::write(&path, serde_json::to_string_pretty(&manifest)?)?;
        tracing::info!("Saved manifest to {}", path.display());
        Ok(path)
    }
}

/// A `PageSource` that saves every page it fetches under one label.
pub struct CapturingSource<'a, P> {
    pub inner: &'a P,
    pub capture: &'a DebugCapture,
    pub label: &'a str,
}

impl<P: PageSource> PageSource for CapturingSource<'_, P> {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let body = self.inner.fetch_text(url).await?;
        self.capture
            .save_page(self.label, &body)
            .map_err(|source| FetchError::Capture { url: url.to_string(), source })?;
        Ok(body)
    }
}

fn sanitize(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
