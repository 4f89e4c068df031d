use alloc::sync::Arc;
use core::fmt;

use crate::{
    buffer::RowBuffer,
    convert::FromCell,
    error::{ConversionFailure, CsvError, ErrorKind, Location, TargetType},
    position::InputPosition,
    specification::{Locale, Specification},
};

/// One field of a [`Row`](crate::Row).
///
/// A cell is a handle into the row's shared buffer: cloning it is cheap, it
/// never copies the text, and it stays valid after the row and the reader
/// that produced it are gone.
///
/// ```rust
/// use csvstream::{Reader, Specification};
///
/// let mut reader = Reader::from_text(" 42 , x\n", Specification::new());
/// let row = reader.next().unwrap().unwrap();
/// let cell = row.get(0).unwrap();
/// drop(row);
/// assert_eq!(cell.parse::<u32>().unwrap(), 42);
/// assert_eq!(cell.input_column(), 1);
/// ```
#[derive(Clone)]
pub struct Cell {
    buffer: Arc<RowBuffer>,
    index: usize,
    spec: Arc<Specification>,
    name: Option<Arc<str>>,
}

impl Default for Cell {
    /// A detached cell: every content access fails with
    /// [`ErrorKind::CellOutOfRange`].
    fn default() -> Self {
        Self {
            buffer: Arc::new(RowBuffer::new()),
            index: 0,
            spec: Arc::default(),
            name: None,
        }
    }
}

impl Cell {
    /// A standalone cell holding `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self::from_parts(
            Arc::new(RowBuffer::from_fields([text])),
            0,
            Arc::default(),
        )
    }

    /// A standalone cell holding `text` and named `name`.
    #[must_use]
    pub fn named(text: &str, name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(text)
        }
    }

    /// A standalone cell that converts under `spec`'s locale.
    #[must_use]
    pub fn with_specification(spec: Arc<Specification>, text: &str) -> Self {
        Self::from_parts(Arc::new(RowBuffer::from_fields([text])), 0, spec)
    }

    pub(crate) fn from_parts(
        buffer: Arc<RowBuffer>,
        index: usize,
        spec: Arc<Specification>,
    ) -> Self {
        Self {
            buffer,
            index,
            spec,
            name: None,
        }
    }

    /// The raw cell content, unquoted and unescaped.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::CellOutOfRange`] for a detached cell.
    pub fn as_str(&self) -> Result<&str, CsvError> {
        self.buffer
            .cell_text(self.index)
            .ok_or_else(|| self.out_of_range())
    }

    /// Converts the content with `T`'s [`FromCell`] implementation and the
    /// specification's locale.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Conversion`] when the content is not a `T`, or
    /// [`ErrorKind::CellOutOfRange`] for a detached cell.
    pub fn parse<T: FromCell + 'static>(&self) -> Result<T, CsvError> {
        self.parse_with(T::from_cell)
    }

    /// Converts the content with a caller-provided function.
    ///
    /// ```rust
    /// use csvstream::{Cell, ConversionFailure};
    ///
    /// let cell = Cell::new("0x1f");
    /// let value = cell
    ///     .parse_with(|text, _| {
    ///         let digits = text.trim().trim_start_matches("0x");
    ///         u8::from_str_radix(digits, 16).map_err(|_| ConversionFailure::Invalid)
    ///     })
    ///     .unwrap();
    /// assert_eq!(value, 31);
    /// ```
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Conversion`] wrapping the function's failure, or
    /// [`ErrorKind::CellOutOfRange`] for a detached cell.
    pub fn parse_with<T, F>(&self, convert: F) -> Result<T, CsvError>
    where
        T: 'static,
        F: FnOnce(&str, &Locale) -> Result<T, ConversionFailure>,
    {
        let text = self.as_str()?;
        convert(text, self.spec.locale()).map_err(|reason| {
            CsvError::new(
                ErrorKind::Conversion {
                    target: TargetType::of::<T>(),
                    reason,
                },
                self.location(),
            )
        })
    }

    /// The column name, or `""` when the column is anonymous.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.name {
            Some(name) => &**name,
            None => self.spec.column_name(self.index),
        }
    }

    /// Logical index of the row this cell belongs to.
    #[must_use]
    pub fn row(&self) -> usize {
        self.buffer.row()
    }

    /// Logical index of this cell within its row.
    #[must_use]
    pub fn column(&self) -> usize {
        self.index
    }

    /// Input line where the cell started.
    #[must_use]
    pub fn input_line(&self) -> usize {
        self.input_position().line
    }

    /// Input column where the cell started.
    #[must_use]
    pub fn input_column(&self) -> usize {
        self.input_position().column
    }

    /// Where the cell started: its first character, the opening quote, or
    /// for an empty cell the position right after the preceding separator.
    ///
    /// A detached cell reports the end of its row.
    #[must_use]
    pub fn input_position(&self) -> InputPosition {
        self.buffer
            .range(self.index)
            .map_or_else(|| self.buffer.trailing_position(), |range| range.position)
    }

    /// Raw and logical coordinates of this cell.
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(self.input_position(), self.row(), self.index)
    }

    /// The dialect this cell was read with.
    #[must_use]
    pub fn specification(&self) -> &Arc<Specification> {
        &self.spec
    }

    fn out_of_range(&self) -> CsvError {
        let size = self.buffer.len();
        CsvError::new(
            ErrorKind::CellOutOfRange {
                index: self.index,
                size,
            },
            Location::new(self.buffer.trailing_position(), self.buffer.row(), size),
        )
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("text", &self.buffer.cell_text(self.index))
            .field("name", &self.name())
            .field("row", &self.row())
            .field("column", &self.index)
            .field("input", &self.input_position())
            .finish()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.buffer.cell_text(self.index).unwrap_or_default())
    }
}

impl PartialEq<str> for Cell {
    fn eq(&self, other: &str) -> bool {
        self.buffer.cell_text(self.index) == Some(other)
    }
}

impl PartialEq<&str> for Cell {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Cell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str().map_err(serde::ser::Error::custom)?)
    }
}
