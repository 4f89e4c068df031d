use alloc::{string::String, sync::Arc};
use core::{any::TypeId, fmt};

use thiserror::Error;

use crate::position::InputPosition;

/// Every failure raised by this crate.
///
/// A `CsvError` pairs the failure class ([`ErrorKind`]) with the place it
/// happened, both in the raw input and in the logical row/column grid.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at {location}")]
pub struct CsvError {
    pub(crate) kind: ErrorKind,
    pub(crate) location: Location,
}

impl CsvError {
    pub(crate) fn new(kind: impl Into<ErrorKind>, location: Location) -> Self {
        Self {
            kind: kind.into(),
            location,
        }
    }

    /// The failure class.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Where the failure happened.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Zero-based raw input line.
    #[must_use]
    pub fn input_line(&self) -> usize {
        self.location.input_line
    }

    /// Zero-based raw input column.
    #[must_use]
    pub fn input_column(&self) -> usize {
        self.location.input_column
    }

    /// Zero-based logical row index.
    #[must_use]
    pub fn row(&self) -> usize {
        self.location.row
    }

    /// Zero-based logical column index.
    #[must_use]
    pub fn column(&self) -> usize {
        self.location.column
    }

    /// The index carried by column-registry and range errors.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.kind {
            ErrorKind::DuplicateColumn { index, .. }
            | ErrorKind::ColumnIndexTooLarge { index }
            | ErrorKind::CellOutOfRange { index, .. }
            | ErrorKind::DefinedCellOutOfRange { index, .. } => Some(index),
            _ => None,
        }
    }

    /// The row size carried by access errors.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self.kind {
            ErrorKind::CellOutOfRange { size, .. }
            | ErrorKind::UndefinedColumn { size, .. }
            | ErrorKind::DefinedCellOutOfRange { size, .. } => Some(size),
            _ => None,
        }
    }

    /// Whether this is a malformed-input error.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self.kind, ErrorKind::Parse(_))
    }
}

/// The failure classes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed quoting.
    #[error("parse error: {0}")]
    Parse(#[from] SyntaxError),
    /// A column name or index was declared twice.
    #[error("duplicate column {name:?}, already bound to index {index}")]
    DuplicateColumn {
        /// The index already bound.
        index: usize,
        /// The name being declared.
        name: Arc<str>,
    },
    /// A column index too large for the name registry to hold.
    #[error("column index {index} cannot be materialized")]
    ColumnIndexTooLarge {
        /// The requested index.
        index: usize,
    },
    /// Positional access beyond the end of a row.
    #[error("cell index {index} out of range for row of size {size}")]
    CellOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of cells in the row.
        size: usize,
    },
    /// Access by a name the specification does not know.
    #[error("undefined column {name:?} in row of size {size}")]
    UndefinedColumn {
        /// The requested name.
        name: Arc<str>,
        /// Number of cells in the row.
        size: usize,
    },
    /// A known name resolves beyond the end of this particular row.
    #[error("column {name:?} has index {index}, out of range for row of size {size}")]
    DefinedCellOutOfRange {
        /// The requested name.
        name: Arc<str>,
        /// The index the name resolves to.
        index: usize,
        /// Number of cells in the row.
        size: usize,
    },
    /// Cell content could not be converted to the requested type.
    #[error("cannot convert cell to {target}: {reason}")]
    Conversion {
        /// The requested type.
        target: TargetType,
        /// Why the conversion failed.
        reason: ConversionFailure,
    },
    /// The character source failed.
    #[error("input source error: {0}")]
    Source(#[from] SourceError),
}

/// Ways the dialect can be violated.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("unterminated quoted cell")]
    UnterminatedQuote,
    #[error("unexpected character {0:?} after quoted cell")]
    UnexpectedAfterQuote(char),
    #[error("unexpected character {0:?} after whitespace")]
    UnexpectedAfterWhitespace(char),
}

/// Why a scalar conversion failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionFailure {
    /// Nothing but whitespace.
    #[error("no value present")]
    Empty,
    /// No prefix of the content forms a value.
    #[error("invalid value")]
    Invalid,
    /// A value was parsed but non-whitespace content follows it.
    #[error("unexpected trailing characters")]
    TrailingCharacters,
    /// The value does not fit the target type.
    #[error("value out of range")]
    OutOfRange,
    /// Raised by a caller-provided converter.
    #[error("{0}")]
    Custom(&'static str),
}

/// The identity of a conversion target type.
#[derive(Debug, Clone, Copy)]
pub struct TargetType {
    id: TypeId,
    name: &'static str,
}

impl TargetType {
    /// The target type `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
        }
    }

    /// Whether this is the target type `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The type's name, as reported by [`core::any::type_name`].
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TargetType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TargetType {}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A failure of the underlying character source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SourceError {
    message: String,
}

impl SourceError {
    /// Wraps a description of a source failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        use alloc::string::ToString;
        Self::new(err.to_string())
    }
}

/// Raw and logical coordinates of a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Zero-based raw input line.
    pub input_line: usize,
    /// Zero-based raw input column.
    pub input_column: usize,
    /// Zero-based logical row index.
    pub row: usize,
    /// Zero-based logical column index.
    pub column: usize,
}

impl Location {
    pub(crate) fn new(input: InputPosition, row: usize, column: usize) -> Self {
        Self {
            input_line: input.line,
            input_column: input.column,
            row,
            column,
        }
    }

    /// The raw input coordinates.
    #[must_use]
    pub fn input(&self) -> InputPosition {
        InputPosition {
            line: self.input_line,
            column: self.input_column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "input {}:{}, cell {}:{}",
            self.input_line, self.input_column, self.row, self.column
        )
    }
}
