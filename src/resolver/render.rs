use pulldown_cmark::{html, Event, Options, Parser};
use tracing::debug;

use super::classify::ContentKind;
use super::tabular::TabularRow;

/// Placeholder shown while a table is still decoding (or decoded to nothing).
pub const DECODING_PLACEHOLDER: &str = "_Decoding table…_";
pub const EMPTY_CONTENT: &str = "_No content available for this document._";

const MIN_WIDTH: usize = 20;
const MAX_CELL_CHARS: usize = 24;
const FENCE: &str = "```";
// Zero-width space keeps embedded fences from closing our block early.
const DEFUSED_FENCE: &str = "`\u{200b}``";

/// Per-surface sizing; the only thing that differs between chat, search
/// and the query-log inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSizing {
    pub width: usize,
    pub max_rows: usize,
}

impl Default for PreviewSizing {
    fn default() -> Self {
        Self {
            width: 80,
            max_rows: 15,
        }
    }
}

/// Render one document body for display.
///
/// `rows` is only consulted for [`ContentKind::Tabular`]; an empty slice
/// means decoding has not produced anything (yet).
pub fn render(kind: ContentKind, content: &str, rows: &[TabularRow], sizing: PreviewSizing) -> String {
    match kind {
        ContentKind::Markdown if content.trim().is_empty() => EMPTY_CONTENT.to_string(),
        ContentKind::Markdown => render_markdown(content, sizing.width),
        ContentKind::Tabular if rows.is_empty() => DECODING_PLACEHOLDER.to_string(),
        ContentKind::Tabular => render_table(rows, sizing.max_rows),
        ContentKind::PlainText | ContentKind::Unknown => render_preformatted(content),
    }
}

/// Markdown -> sanitized HTML -> wrapped rich text.
///
/// Raw HTML blocks and inline tags are demoted to literal text before
/// the HTML is emitted, so nothing from the document is passed through
/// as markup.
pub fn render_markdown(content: &str, width: usize) -> String {
    let html = sanitized_html(content);
    match html2text::from_read(html.as_bytes(), width.max(MIN_WIDTH)) {
        Ok(text) => text.trim_end().to_string(),
        Err(e) => {
            debug!(error = %e, "markdown layout failed, falling back to source text");
            render_preformatted(content)
        }
    }
}

pub(crate) fn sanitized_html(content: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let events = Parser::new_ext(content, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(content.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Monospace grid. Columns come from the first row's headers.
pub fn render_table(rows: &[TabularRow], max_rows: usize) -> String {
    let Some(first) = rows.first() else {
        return DECODING_PLACEHOLDER.to_string();
    };
    let headers: Vec<&str> = first.columns().collect();
    let shown = &rows[..rows.len().min(max_rows.max(1))];

    let body: Vec<Vec<String>> = shown
        .iter()
        .map(|row| headers.iter().map(|h| clip(row.get(h).unwrap_or(""))).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| clip(h).chars().count()).collect();
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::from(FENCE);
    out.push('\n');
    let header_cells: Vec<String> = headers.iter().map(|h| clip(h)).collect();
    push_grid_line(&mut out, &header_cells, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_grid_line(&mut out, &rule, &widths);
    for cells in &body {
        push_grid_line(&mut out, cells, &widths);
    }
    out.push_str(FENCE);

    if rows.len() > shown.len() {
        out.push_str(&format!("\n… {} more rows", rows.len() - shown.len()));
    }
    out
}

fn push_grid_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn clip(cell: &str) -> String {
    // Newlines inside quoted cells would break the grid.
    let flat = cell.replace(['\r', '\n'], " ").replace(FENCE, DEFUSED_FENCE);
    if flat.chars().count() > MAX_CELL_CHARS {
        let mut s: String = flat.chars().take(MAX_CELL_CHARS - 1).collect();
        s.push('…');
        s
    } else {
        flat
    }
}

/// Verbatim block, whitespace and line breaks preserved.
pub fn render_preformatted(content: &str) -> String {
    if content.is_empty() {
        return EMPTY_CONTENT.to_string();
    }
    format!("{FENCE}\n{}\n{FENCE}", content.replace(FENCE, DEFUSED_FENCE))
}
