//! Position and range types for source locations.

use serde::Serialize;

/// Source file identifier assigned by the host.
///
/// `FileId`s are stable for the lifetime of a compilation and are used to
/// tell whether two declarations live in the same syntax tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(u32);

impl FileId {
    /// Create a new `FileId` from a raw u32 value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value of this `FileId`.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Byte offset range in a source file.
///
/// Byte offsets are converted to [`LineCol`] only when presenting to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct OffsetRange {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl OffsetRange {
    /// Create a new offset range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range at a specific offset.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length of this range in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if this is a zero-width range.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `other` lies completely inside this range.
    #[must_use]
    pub const fn contains_range(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest range covering both `self` and `other`.
    #[must_use]
    pub fn cover(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Returns `true` if two edits on these ranges cannot be applied together.
    ///
    /// Touching ranges conflict when one of them is an insertion point, since the
    /// resulting text would depend on application order.
    #[must_use]
    pub const fn conflicts_with(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            self.start <= other.end && other.start <= self.end
        } else {
            self.start < other.end && other.start < self.end
        }
    }
}

impl std::fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A range inside a specific file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Location {
    pub file: FileId,
    pub range: OffsetRange,
}

impl Location {
    #[must_use]
    pub const fn new(file: FileId, range: OffsetRange) -> Self {
        Self { file, range }
    }
}

/// Line and column of a byte offset (both 1-indexed, column counted in chars).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    /// Compute the line and column for `offset` in `text`.
    ///
    /// Offsets past the end of the text are clamped to the end.
    #[must_use]
    pub fn of(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = text.get(..offset).unwrap_or(text);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self {
            line: line as u32,
            column: column as u32,
        }
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
