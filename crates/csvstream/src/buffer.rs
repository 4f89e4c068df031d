use alloc::{string::String, vec::Vec};

use crate::position::InputPosition;

/// Byte range of one cell inside [`RowBuffer::text`], plus where the cell
/// started and ended in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellRange {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) position: InputPosition,
    /// Input position just past the cell: after its last kept character or
    /// its closing quote. Equal to `position` for an empty cell.
    pub(crate) input_end: InputPosition,
}

#[derive(Debug, Clone, Copy)]
struct OpenCell {
    start: usize,
    /// End of the last character that is not held trailing whitespace.
    content_end: usize,
    position: InputPosition,
    /// Input position of the first held whitespace character.
    held_from: Option<InputPosition>,
}

/// Storage for one logical row: the unescaped characters of every cell,
/// back to back, and the ranges that split them.
///
/// The reader mutates a buffer only while it is private. Once wrapped in an
/// `Arc` and handed to a [`Row`](crate::Row) it is never touched again.
#[derive(Debug, Clone, Default)]
pub(crate) struct RowBuffer {
    text: String,
    ranges: Vec<CellRange>,
    input_line: usize,
    row: usize,
    /// Position of the row terminator.
    end: InputPosition,
    open: Option<OpenCell>,
}

impl RowBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buffer = Self::new();
        let mut position = InputPosition::default();
        for field in fields {
            let field = field.as_ref();
            let start = buffer.text.len();
            buffer.text.push_str(field);
            let input_end = InputPosition {
                line: 0,
                column: position.column + field.chars().count(),
            };
            buffer.ranges.push(CellRange {
                start,
                end: buffer.text.len(),
                position,
                input_end,
            });
            // As if joined by a single separator.
            position.column = input_end.column + 1;
        }
        buffer.end = InputPosition {
            line: 0,
            column: position.column.saturating_sub(1),
        };
        buffer
    }

    /// Empties the buffer for reuse as row `row`, starting on `input_line`.
    pub(crate) fn reset(&mut self, row: usize, input_line: usize) {
        self.text.clear();
        self.ranges.clear();
        self.open = None;
        self.row = row;
        self.input_line = input_line;
        self.end = InputPosition::line_start(input_line);
    }

    pub(crate) fn open_cell(&mut self, position: InputPosition) {
        debug_assert!(self.open.is_none(), "cell already open");
        let start = self.text.len();
        self.open = Some(OpenCell {
            start,
            content_end: start,
            position,
            held_from: None,
        });
    }

    pub(crate) fn push(&mut self, ch: char) {
        self.text.push(ch);
        if let Some(open) = &mut self.open {
            open.content_end = self.text.len();
            open.held_from = None;
        }
    }

    /// Appends whitespace read at `at` that is dropped if the cell closes
    /// before another content character arrives.
    pub(crate) fn push_tentative(&mut self, ch: char, at: InputPosition) {
        self.text.push(ch);
        if let Some(open) = &mut self.open {
            open.held_from.get_or_insert(at);
        }
    }

    pub(crate) fn revert_tentative(&mut self) {
        if let Some(open) = &self.open {
            self.text.truncate(open.content_end);
        }
    }

    /// Closes the open cell. `at` is the input position of the character
    /// that ended it, unless held whitespace ends it earlier.
    pub(crate) fn close_cell(&mut self, at: InputPosition) {
        self.revert_tentative();
        if let Some(open) = self.open.take() {
            self.push_range(CellRange {
                start: open.start,
                end: self.text.len(),
                position: open.position,
                input_end: open.held_from.unwrap_or(at),
            });
        }
    }

    pub(crate) fn push_empty_cell(&mut self, position: InputPosition) {
        debug_assert!(self.open.is_none(), "cell still open");
        let at = self.text.len();
        self.push_range(CellRange {
            start: at,
            end: at,
            position,
            input_end: position,
        });
    }

    fn push_range(&mut self, range: CellRange) {
        debug_assert!(range.start <= range.end && range.end <= self.text.len());
        debug_assert!(self.ranges.last().is_none_or(|last| last.end <= range.start));
        self.ranges.push(range);
    }

    pub(crate) fn finish(&mut self, end: InputPosition) {
        self.close_cell(end);
        self.end = end;
    }

    pub(crate) fn len(&self) -> usize {
        self.ranges.len()
    }

    pub(crate) fn range(&self, index: usize) -> Option<&CellRange> {
        self.ranges.get(index)
    }

    pub(crate) fn cell_text(&self, index: usize) -> Option<&str> {
        self.ranges
            .get(index)
            .and_then(|range| self.text.get(range.start..range.end))
    }

    pub(crate) fn input_line(&self) -> usize {
        self.input_line
    }

    pub(crate) fn row(&self) -> usize {
        self.row
    }

    /// Input position just past the last cell, or of the row terminator
    /// when the row has no cells.
    pub(crate) fn trailing_position(&self) -> InputPosition {
        self.ranges.last().map_or(self.end, |range| range.input_end)
    }

    /// Checks that ranges are ordered, disjoint and inside the text.
    #[cfg(any(test, feature = "fuzzing"))]
    pub(crate) fn is_consistent(&self) -> bool {
        let mut previous_end = 0;
        for range in &self.ranges {
            if range.start < previous_end || range.end < range.start {
                return false;
            }
            if range.end > self.text.len() || !self.text.is_char_boundary(range.start) {
                return false;
            }
            previous_end = range.end;
        }
        self.open.is_none()
    }

    #[cfg(test)]
    pub(crate) fn text_capacity(&self) -> usize {
        self.text.capacity()
    }
}
