use std::fmt;

/// How a cited document's content should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Markdown,
    Tabular,
    PlainText,
    /// Path has no extension at all.
    Unknown,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContentKind::Markdown => "markdown",
            ContentKind::Tabular => "tabular",
            ContentKind::PlainText => "plain-text",
            ContentKind::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Classify a (normalized) path by its final `.`-separated segment.
pub fn classify(path: &str) -> ContentKind {
    let mut segments = path.rsplit('.');
    let extension = segments.next().unwrap_or_default();
    if segments.next().is_none() {
        return ContentKind::Unknown;
    }

    match extension.to_ascii_lowercase().as_str() {
        "md" => ContentKind::Markdown,
        "csv" => ContentKind::Tabular,
        _ => ContentKind::PlainText,
    }
}
