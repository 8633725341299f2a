//! Snapshot helpers for analyzer diagnostics
//!
//! Diagnostics are formatted consistently so inline snapshots stay readable.

use crate::MARKER;

/// Format a list of diagnostics for snapshot testing.
///
/// # Example
///
/// ```ignore
/// use wpf_test_utils::assertions::format_diagnostics;
///
/// let diagnostics = analyzer.analyze_tree(&model, &token)?;
/// insta::assert_snapshot!(format_diagnostics(&diagnostics));
/// ```
pub fn format_diagnostics<D: std::fmt::Display>(diagnostics: &[D]) -> String {
    if diagnostics.is_empty() {
        return String::from("(no diagnostics)");
    }

    diagnostics
        .iter()
        .enumerate()
        .map(|(i, d)| format!("[{}] {d}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format diagnostics with their messages only (without position info).
pub fn format_diagnostic_messages<T: AsRef<str>>(messages: &[T]) -> String {
    if messages.is_empty() {
        return String::from("(no diagnostics)");
    }

    messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("[{}] {}", i + 1, m.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Re-inserts `↓` markers at the given byte offsets.
///
/// Rendering reported diagnostic starts this way lets a test compare against
/// the marked-up fixture it started from.
pub fn insert_markers(text: &str, offsets: &[usize]) -> String {
    let mut offsets = offsets.to_vec();
    offsets.sort_unstable();
    offsets.dedup();
    let mut marked = String::with_capacity(text.len() + offsets.len() * MARKER.len_utf8());
    let mut last = 0;
    for offset in offsets {
        let Some(chunk) = text.get(last..offset) else {
            continue;
        };
        marked.push_str(chunk);
        marked.push(MARKER);
        last = offset;
    }
    marked.push_str(text.get(last..).unwrap_or_default());
    marked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_diagnostics_empty() {
        let empty: Vec<String> = vec![];
        assert_eq!(format_diagnostics(&empty), "(no diagnostics)");
    }

    #[test]
    fn test_format_diagnostics_single() {
        let diagnostics = vec!["warning[WPF0003] Property 'Bar' must be named Foo"];
        let formatted = format_diagnostics(&diagnostics);
        assert!(formatted.starts_with("[1] "));
        assert!(formatted.contains("WPF0003"));
    }

    #[test]
    fn test_format_diagnostic_messages() {
        let messages = vec!["Use SetValue in setter.", "Register Bar as name."];
        let formatted = format_diagnostic_messages(&messages);
        assert_eq!(formatted, "[1] Use SetValue in setter.\n[2] Register Bar as name.");
    }

    #[test]
    fn test_insert_markers_round_trips_stripped_fixture() {
        let (text, offsets) = crate::strip_markers("int ↓a = ↓b;");
        assert_eq!(text, "int a = b;");
        assert_eq!(insert_markers(&text, &offsets), "int ↓a = ↓b;");
    }

    #[test]
    fn test_insert_markers_ignores_duplicates_and_out_of_range() {
        assert_eq!(insert_markers("abc", &[1, 1, 10]), "a↓bc");
    }
}
