//! Source file spans and locations

use core::ops::Range;

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A unique identifier for a source file
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("file#{_0}")]
pub struct FileId(pub u32);

impl FileId {
    /// Creates a file id from its raw index.
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("{start}..{end}")]
pub struct Span {
    /// Inclusive start offset
    pub start: u32,
    /// Exclusive end offset
    pub end: u32,
}

impl Span {
    /// Creates a span from two byte offsets.
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns the span as a `usize` range, for slicing source text.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A span with associated file
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[display("{file}:{span}")]
pub struct FileSpan {
    /// File containing the span
    pub file: FileId,
    /// Byte range inside the file
    pub span: Span,
}

impl FileSpan {
    /// Creates a span inside `file`.
    #[must_use]
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }

    /// Placeholder span for nodes that have no source location.
    #[must_use]
    pub fn dummy() -> Self {
        Self::new(FileId(0), Span::new(0, 0))
    }

    /// Returns the byte range of the span.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.span.range()
    }

    /// Joins two spans of the same file; keeps `self` if the files differ.
    #[must_use]
    pub fn to(self, other: Self) -> Self {
        if self.file == other.file {
            Self::new(self.file, self.span.to(other.span))
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_join() {
        let joined = Span::new(4, 8).to(Span::new(2, 6));
        assert_eq!(joined, Span::new(2, 8));
        assert_eq!(joined.len(), 6);
    }

    #[test]
    fn test_file_span_join_across_files() {
        let lhs = FileSpan::new(FileId(1), Span::new(0, 3));
        let rhs = FileSpan::new(FileId(2), Span::new(5, 9));
        assert_eq!(lhs.to(rhs), lhs);
    }

    #[test]
    fn test_display() {
        let span = FileSpan::new(FileId(3), Span::new(10, 12));
        assert_eq!(span.to_string(), "file#3:10..12");
    }
}
