use std::collections::HashSet;

use tracing::{debug, warn};

/// One decoded data row: header -> cell, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularRow {
    cells: Vec<(String, String)>,
}

impl TabularRow {
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(k, _)| k.as_str())
    }

    /// Cell under `column`, if the header has it. Header names are unique
    /// after decoding.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }
}

/// Decode comma-separated text into header-keyed rows.
///
/// Best effort: blank lines are skipped, short rows are padded with empty
/// cells, extra trailing fields are dropped, and a parse error yields an
/// empty result (logged, never returned).
pub fn decode_rows(text: &str) -> Vec<TabularRow> {
    match try_decode(text) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, len = text.len(), "tabular decode failed, showing no rows");
            Vec::new()
        }
    }
}

fn try_decode(text: &str) -> Result<Vec<TabularRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = unique_headers(reader.headers()?.iter());
    if headers.iter().all(|h| h.is_empty()) {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        // A whitespace-free blank line can still surface as one empty field.
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let cells = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(TabularRow { cells });
    }

    debug!(columns = headers.len(), rows = rows.len(), "tabular payload decoded");
    Ok(rows)
}

/// Rename repeated header names `a`, `a_1`, `a_2`, ... so no column is
/// shadowed by an earlier one with the same name.
fn unique_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();
    for name in raw {
        let mut unique = name.to_string();
        let mut suffix = 1;
        while seen.contains(&unique) {
            unique = format!("{name}_{suffix}");
            suffix += 1;
        }
        seen.insert(unique.clone());
        headers.push(unique);
    }
    headers
}

/// Decode off the async executor. Always completes; a failed worker
/// degrades to an empty result like any other decode failure.
pub async fn decode(text: String) -> Vec<TabularRow> {
    match tokio::task::spawn_blocking(move || decode_rows(&text)).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "tabular decode worker failed");
            Vec::new()
        }
    }
}
