//! HTML report generation.
//!
//! Emits one self-contained page listing every manifest record in order.
//! All manifest text is escaped before it reaches the page.

pub mod assets;

use std::path::{Path, PathBuf};
use tracing::info;

use crate::manifest::{Manifest, ScreenshotRecord};
use crate::Result;

pub use assets::copy_assets;

/// File name of the generated report inside the working directory.
pub const REPORT_FILE_NAME: &str = "index.html";

/// Render the manifest in `dir` to `<dir>/index.html` and return its
/// absolute path. Tiles are looked up in `dir`; assets must already be there.
pub fn render_report(dir: &Path) -> Result<PathBuf> {
    let manifest = Manifest::load(dir)?;
    let html = render_html(&manifest, dir);

    let path = dir.join(REPORT_FILE_NAME);
    std::fs::write(&path, html)?;
    let path = path.canonicalize()?;

    info!(path = %path.display(), screenshots = manifest.len(), "Rendered screenshot report");
    Ok(path)
}

/// Build the report document for `manifest`, checking tile presence in `dir`.
pub fn render_html(manifest: &Manifest, dir: &Path) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>");
    html.push_str("<html>");
    html.push_str("<head>");
    html.push_str(r#"<meta charset="UTF-8">"#);
    html.push_str(r#"<script src="default.js"></script>"#);
    html.push_str(r#"<link rel="stylesheet" href="default.css">"#);
    html.push_str("</head>");
    html.push_str("<body>");
    html.push_str("<!-- begin results -->");

    for (index, record) in manifest.records().iter().enumerate() {
        emit_record(&mut html, record, index % 2 == 0, dir);
    }

    html.push_str("</body></html>");
    html
}

fn emit_record(html: &mut String, record: &ScreenshotRecord, alternate: bool, dir: &Path) {
    let name = escape_html(record.name.as_deref().unwrap_or_default());

    if alternate {
        html.push_str(r#"<div class="screenshot alternate">"#);
    } else {
        html.push_str(r#"<div class="screenshot">"#);
    }
    html.push_str(&format!(r#"<div class="screenshot_name">{}</div>"#, name));
    html.push_str(&format!(
        r#"<button class="view_dump" data-name="{}">Dump view hierarchy</button>"#,
        name
    ));

    if let Some(extra) = extras_text(record) {
        html.push_str(&format!(
            r#"<button class="extra" data="{}">Extra info</button>"#,
            escape_html(&extra)
        ));
    }

    if let Some(description) = &record.description {
        html.push_str(&format!(
            r#"<div class="screenshot_description">{}</div>"#,
            escape_html(description)
        ));
    }

    match &record.error {
        Some(error) => html.push_str(&format!(
            r#"<div class="screenshot_error">{}</div>"#,
            escape_html(error)
        )),
        None => emit_tiles(html, record, dir),
    }

    html.push_str("</div>");
}

/// Non-empty extras joined into one block, or None if there are none.
fn extras_text(record: &ScreenshotRecord) -> Option<String> {
    let text: String = record
        .extras
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(key, text)| format!("*****{}*****\n\n{}\n\n\n", key, text))
        .collect();

    (!text.is_empty()).then_some(text)
}

fn emit_tiles(html: &mut String, record: &ScreenshotRecord, dir: &Path) {
    html.push_str(r#"<table class="img-wrapper">"#);
    for y in 0..record.tile_height {
        html.push_str("<tr>");
        for x in 0..record.tile_width {
            html.push_str("<td>");
            let file_name = record.tile_file_name(x, y);
            // Missing tiles leave the cell empty
            if dir.join(&file_name).exists() {
                html.push_str(&format!(r#"<img src="./{}" />"#, escape_html(&file_name)));
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
}

/// Escape HTML special characters
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
