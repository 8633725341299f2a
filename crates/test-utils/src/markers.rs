//! Position markers for analyzer tests.
//!
//! A `↓` in fixture source marks where a diagnostic is expected to start.
//! Markers are removed before parsing and their offsets refer to the clean
//! text.

/// The expected-diagnostic marker.
pub const MARKER: char = '↓';

/// Removes every [`MARKER`] and returns the clean source with the byte
/// offsets the markers stood at.
///
/// # Example
///
/// ```
/// use wpf_test_utils::strip_markers;
///
/// let (source, offsets) = strip_markers("int ↓x;");
/// assert_eq!(source, "int x;");
/// assert_eq!(offsets, vec![4]);
/// ```
pub fn strip_markers(input: &str) -> (String, Vec<usize>) {
    let mut text = String::with_capacity(input.len());
    let mut offsets = Vec::new();
    for c in input.chars() {
        if c == MARKER {
            offsets.push(text.len());
        } else {
            text.push(c);
        }
    }
    (text, offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markers_multiline() {
        let (text, offsets) = strip_markers("class C\n{\n    ↓int X;\n    ↓int Y;\n}");
        assert_eq!(text, "class C\n{\n    int X;\n    int Y;\n}");
        assert_eq!(offsets, vec![14, 25]);
        assert_eq!(&text[14..17], "int");
    }

    #[test]
    fn test_strip_markers_without_markers() {
        let (text, offsets) = strip_markers("class C { }");
        assert_eq!(text, "class C { }");
        assert!(offsets.is_empty());
    }
}
