use core::fmt;

/// A raw position in the input text.
///
/// Both coordinates are zero-based. A `\r\n` pair counts as a single newline,
/// and the end of input does not advance the position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputPosition {
    /// Zero-based line number.
    pub line: usize,
    /// Zero-based column, counted in characters.
    pub column: usize,
}

impl InputPosition {
    /// Position of the first character of `line`.
    #[must_use]
    pub const fn line_start(line: usize) -> Self {
        Self { line, column: 0 }
    }

    pub(crate) fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl fmt::Display for InputPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
