/// Marker the ingestion backend leaves in host-absolute upload paths,
/// e.g. `C:\Users\svc\AppData\Local\tmp\manuals\guide.md`.
pub const TMP_MARKER: &str = "\\tmp\\";

/// Reduce a backend file path to a stable display identifier.
///
/// Returns whatever follows the last `\tmp\` marker, or the input unchanged
/// when the marker is absent. Idempotent as long as the remainder does not
/// itself contain the marker, which the last-occurrence rule guarantees.
pub fn normalize(raw: &str) -> String {
    match raw.rfind(TMP_MARKER) {
        Some(pos) => raw[pos + TMP_MARKER.len()..].to_string(),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_through_last_marker() {
        assert_eq!(
            normalize(r"C:\Users\svc\tmp\upload\tmp\manuals\guide.md"),
            r"manuals\guide.md"
        );
    }

    #[test]
    fn test_single_marker() {
        assert_eq!(normalize(r"D:\tmp\report.csv"), "report.csv");
    }

    #[test]
    fn test_no_marker_unchanged() {
        assert_eq!(normalize("docs/guide.md"), "docs/guide.md");
        assert_eq!(normalize("/tmp/guide.md"), "/tmp/guide.md");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_trailing_marker_yields_empty() {
        assert_eq!(normalize(r"C:\tmp\"), "");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            r"C:\a\tmp\b\tmp\c.md",
            r"X:\tmp\data.csv",
            "plain.txt",
            "",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }
}
