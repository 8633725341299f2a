//! Source edits produced by analyzer fixes.
//!
//! Offsets are byte offsets into the text the diagnostic was reported on.

use serde::Serialize;

use crate::OffsetRange;

/// Replacement of one byte range of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub offset_range: OffsetRange,
    /// Empty for deletions
    pub new_text: String,
}

impl TextEdit {
    #[must_use]
    pub fn new(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            offset_range: OffsetRange::new(start, end),
            new_text: new_text.into(),
        }
    }

    /// Create an edit replacing `range`.
    #[must_use]
    pub fn replace(range: OffsetRange, new_text: impl Into<String>) -> Self {
        Self::new(range.start, range.end, new_text)
    }

    /// Remove `start..end`.
    #[must_use]
    pub fn delete(start: usize, end: usize) -> Self {
        Self {
            offset_range: OffsetRange::new(start, end),
            new_text: String::new(),
        }
    }

    /// Insert `text` at `position`.
    #[must_use]
    pub fn insert(position: usize, text: impl Into<String>) -> Self {
        Self {
            offset_range: OffsetRange::at(position),
            new_text: text.into(),
        }
    }

    #[must_use]
    pub fn is_deletion(&self) -> bool {
        self.new_text.is_empty() && !self.offset_range.is_empty()
    }

    #[must_use]
    pub fn is_insertion(&self) -> bool {
        self.offset_range.is_empty() && !self.new_text.is_empty()
    }
}

/// A labelled group of edits that resolves one diagnostic.
///
/// The edits are applied together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeFix {
    /// Shown to the user, e.g. `Rename to: 'BarProperty'`
    pub label: String,
    /// The text edits to apply, never overlapping each other
    pub edits: Vec<TextEdit>,
}

impl CodeFix {
    #[must_use]
    pub fn new(label: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            label: label.into(),
            edits,
        }
    }

    /// Fix with a single replacement edit.
    #[must_use]
    pub fn replace(label: impl Into<String>, range: OffsetRange, new_text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            edits: vec![TextEdit::replace(range, new_text)],
        }
    }

    /// Fix with a single insertion edit.
    #[must_use]
    pub fn insert(label: impl Into<String>, position: usize, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            edits: vec![TextEdit::insert(position, text)],
        }
    }

    #[must_use]
    pub fn has_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Returns `true` if any edit of this fix conflicts with any of `edits`.
    #[must_use]
    pub fn conflicts_with(&self, edits: &[TextEdit]) -> bool {
        self.edits.iter().any(|mine| {
            edits
                .iter()
                .any(|theirs| mine.offset_range.conflicts_with(&theirs.offset_range))
        })
    }

    /// Apply this fix to `text`.
    pub fn apply(&self, text: &str) -> Result<String, EditError> {
        apply_edits(text, &self.edits)
    }
}

/// Errors produced while applying edits to a text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("edit {range} is outside of the text (length {len})")]
    OutOfBounds { range: OffsetRange, len: usize },
    #[error("edits {first} and {second} overlap")]
    Overlapping {
        first: OffsetRange,
        second: OffsetRange,
    },
}

/// Apply a set of non-overlapping edits to `text` in a single pass.
///
/// The edits may be given in any order.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.offset_range.start, edit.offset_range.end));

    for pair in sorted.windows(2) {
        if pair[0].offset_range.conflicts_with(&pair[1].offset_range) {
            return Err(EditError::Overlapping {
                first: pair[0].offset_range,
                second: pair[1].offset_range,
            });
        }
    }

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in sorted {
        let range = edit.offset_range;
        let (Some(unchanged), true) = (text.get(cursor..range.start), range.end <= text.len())
        else {
            return Err(EditError::OutOfBounds {
                range,
                len: text.len(),
            });
        };
        result.push_str(unchanged);
        result.push_str(&edit.new_text);
        cursor = range.end;
    }
    result.push_str(text.get(cursor..).unwrap_or_default());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_edit_creation() {
        let edit = TextEdit::new(10, 20, "replacement");
        assert_eq!(edit.offset_range, OffsetRange::new(10, 20));
        assert_eq!(edit.new_text, "replacement");
        assert!(!edit.is_deletion());
        assert!(!edit.is_insertion());
    }

    #[test]
    fn test_text_edit_delete() {
        let edit = TextEdit::delete(5, 15);
        assert!(edit.is_deletion());
        assert!(!edit.is_insertion());
    }

    #[test]
    fn test_text_edit_insert() {
        let edit = TextEdit::insert(10, "inserted text");
        assert_eq!(edit.offset_range, OffsetRange::at(10));
        assert!(edit.is_insertion());
    }

    #[test]
    fn test_code_fix_no_edits() {
        let fix = CodeFix::new("Empty fix", vec![]);
        assert!(!fix.has_edits());
    }

    #[test]
    fn test_apply_edits_any_order() {
        let text = "public int Bar;";
        let edits = vec![
            TextEdit::new(11, 14, "Baz"),
            TextEdit::new(7, 10, "double"),
        ];
        assert_eq!(apply_edits(text, &edits).unwrap(), "public double Baz;");
    }

    #[test]
    fn test_apply_edits_insert_and_delete() {
        let text = "a\nb\nc\n";
        let edits = vec![TextEdit::delete(4, 6), TextEdit::insert(0, "c\n")];
        assert_eq!(apply_edits(text, &edits).unwrap(), "c\na\nb\n");
    }

    #[test]
    fn test_apply_edits_overlapping() {
        let edits = vec![TextEdit::new(0, 3, "x"), TextEdit::new(2, 4, "y")];
        assert_eq!(
            apply_edits("abcdef", &edits),
            Err(EditError::Overlapping {
                first: OffsetRange::new(0, 3),
                second: OffsetRange::new(2, 4),
            })
        );
    }

    #[test]
    fn test_apply_edits_out_of_bounds() {
        let edits = vec![TextEdit::new(2, 10, "x")];
        assert!(matches!(
            apply_edits("abc", &edits),
            Err(EditError::OutOfBounds { len: 3, .. })
        ));
    }

    #[test]
    fn test_code_fix_conflicts() {
        let fix = CodeFix::replace("Rename", OffsetRange::new(4, 8), "Bar");
        assert!(fix.conflicts_with(&[TextEdit::insert(4, "x")]));
        assert!(!fix.conflicts_with(&[TextEdit::new(9, 12, "y")]));
    }
}
