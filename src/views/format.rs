use crate::api::types::parse_timestamp;

/// `< 1 s` as whole milliseconds, otherwise seconds with two decimals.
pub fn format_latency(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0} ms", seconds * 1000.0)
    } else {
        format!("{:.2} s", seconds)
    }
}

/// `MMM dd, yyyy HH:mm:ss`, or the raw string if it doesn't parse.
pub fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%b %d, %Y %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

/// Last path segment, capped at 20 chars.
pub fn short_name(path: &str) -> String {
    let last = path.rsplit(['/', '\\']).next().unwrap_or(path);
    truncate_text(last, 20)
}

/// Relevance score as a match percentage, e.g. `87.3%`.
pub fn format_match(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Collapse newlines so a value fits on one list line.
pub fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency() {
        assert_eq!(format_latency(0.4567), "457 ms");
        assert_eq!(format_latency(0.0), "0 ms");
        assert_eq!(format_latency(1.0), "1.00 s");
        assert_eq!(format_latency(12.346), "12.35 s");
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(format_timestamp("2024-05-01T09:03:07.5"), "May 01, 2024 09:03:07");
        assert_eq!(format_timestamp("not a date"), "not a date");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_text("short", 100), "short");
        assert_eq!(truncate_text(&"a".repeat(101), 100), format!("{}...", "a".repeat(100)));
        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("docs/guides/setup.md"), "setup.md");
        assert_eq!(short_name(r"manuals\setup.md"), "setup.md");
        assert_eq!(
            short_name("a/very-long-document-name-v2.pdf"),
            "very-long-document-n..."
        );
    }

    #[test]
    fn test_match_and_one_line() {
        assert_eq!(format_match(0.8734), "87.3%");
        assert_eq!(one_line("a\n  b\tc"), "a b c");
    }
}
