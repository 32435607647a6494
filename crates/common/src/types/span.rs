// TVD - Time-Travel VM Debugger
// Copyright (C) 2026 TVD contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Byte spans into evaluated source text and line/column mapping.
//!
//! Spans are half-open byte ranges into the text that was last submitted to
//! the engine; they are meaningless against text that has since changed.
//! [`LineIndex`] converts between byte offsets and the 1-based line/column
//! positions used by editing surfaces.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` into evaluated source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character covered by the span.
    pub start: usize,
    /// Byte offset one past the last covered character.
    pub end: usize,
}

impl Span {
    /// Create a span. `start` must not exceed `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} > end {end}");
        Self { start, end }
    }

    /// Width of the span in bytes. Narrower spans are more specific.
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(&self, other: Self) -> Self {
        Self { start: self.start.min(other.start), end: self.end.max(other.end) }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A 1-based line/column position, following editor conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number within the line, starting at 1.
    pub column: usize,
}

impl Position {
    /// Create a position. Lines and columns start at 1.
    pub fn new(line: usize, column: usize) -> Self {
        debug_assert!(line >= 1 && column >= 1, "positions are 1-based");
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets in one source text to 1-based line/column positions.
///
/// Built once per evaluated text; all span queries for that text go through
/// the same index so offsets and positions cannot drift apart.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
    /// Total length of the indexed text.
    len: usize,
}

impl LineIndex {
    /// Build an index for `text`.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts, len: text.len() }
    }

    /// Position of a byte offset. Offsets past the end clamp to the last
    /// position of the text.
    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position { line: line + 1, column: offset - self.line_starts[line] + 1 }
    }

    /// Start and end positions of a span.
    pub fn span_range(&self, span: Span) -> (Position, Position) {
        (self.position_at(span.start), self.position_at(span.end))
    }

    /// Whether `span` covers `pos` under the editor containment rule: the
    /// span must start and end on the queried line and the column must fall
    /// inside `[start.column, end.column]`.
    pub fn span_covers(&self, span: Span, pos: Position) -> bool {
        let (start, end) = self.span_range(span);
        start.line == pos.line
            && end.line == pos.line
            && start.column <= pos.column
            && end.column >= pos.column
    }
}
