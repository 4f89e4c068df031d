use alloc::sync::Arc;
use core::{fmt, iter::FusedIterator, ops::Range};

use crate::{
    buffer::RowBuffer,
    cell::Cell,
    error::{CsvError, ErrorKind, Location},
    specification::Specification,
};

/// One logical row: an ordered sequence of [`Cell`]s.
///
/// Rows are immutable. Cloning a row, or taking cells out of it, shares the
/// underlying buffer.
#[derive(Clone)]
pub struct Row {
    buffer: Arc<RowBuffer>,
    spec: Arc<Specification>,
}

impl Row {
    pub(crate) fn new(buffer: Arc<RowBuffer>, spec: Arc<Specification>) -> Self {
        Self { buffer, spec }
    }

    /// A row holding `fields` verbatim, read with the default dialect.
    ///
    /// ```rust
    /// use csvstream::Row;
    ///
    /// let row = Row::from_fields(["a", " b ", ""]);
    /// assert_eq!(row.len(), 3);
    /// assert_eq!(row.get(1).unwrap().as_str().unwrap(), " b ");
    /// ```
    #[must_use]
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_specification(Arc::default(), fields)
    }

    /// A row holding `fields` verbatim, named and converted under `spec`.
    #[must_use]
    pub fn with_specification<I, S>(spec: Arc<Specification>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(Arc::new(RowBuffer::from_fields(fields)), spec)
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the row has no cells. Only blank lines read with
    /// significant blank lines produce such rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell `index`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::CellOutOfRange`] when `index >= self.len()`.
    pub fn get(&self, index: usize) -> Result<Cell, CsvError> {
        if index < self.len() {
            Ok(self.cell(index))
        } else {
            Err(self.trailing_error(ErrorKind::CellOutOfRange {
                index,
                size: self.len(),
            }))
        }
    }

    /// The cell of the column named `name`.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::UndefinedColumn`] when the specification does not know
    /// `name`, and [`ErrorKind::DefinedCellOutOfRange`] when this row is too
    /// short to hold that column.
    pub fn by_name(&self, name: &str) -> Result<Cell, CsvError> {
        let size = self.len();
        match self.spec.index_of(name) {
            None => Err(self.trailing_error(ErrorKind::UndefinedColumn {
                name: name.into(),
                size,
            })),
            Some(index) if index >= size => {
                Err(self.trailing_error(ErrorKind::DefinedCellOutOfRange {
                    name: name.into(),
                    index,
                    size,
                }))
            }
            Some(index) => Ok(self.cell(index)),
        }
    }

    /// The cell of the column named `name`, if this row has one.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Cell> {
        self.spec
            .index_of(name)
            .filter(|&index| index < self.len())
            .map(|index| self.cell(index))
    }

    /// Iterates over the cells in column order.
    #[must_use]
    pub fn iter(&self) -> Cells<'_> {
        Cells {
            row: self,
            range: 0..self.len(),
        }
    }

    /// Input line where the row began.
    #[must_use]
    pub fn input_line(&self) -> usize {
        self.buffer.input_line()
    }

    /// Logical row index, counting every row produced before this one.
    #[must_use]
    pub fn row(&self) -> usize {
        self.buffer.row()
    }

    /// The dialect this row was read with.
    #[must_use]
    pub fn specification(&self) -> &Arc<Specification> {
        &self.spec
    }

    fn cell(&self, index: usize) -> Cell {
        Cell::from_parts(self.buffer.clone(), index, self.spec.clone())
    }

    /// Access errors point just past the last real cell.
    fn trailing_error(&self, kind: ErrorKind) -> CsvError {
        CsvError::new(
            kind,
            Location::new(self.buffer.trailing_position(), self.row(), self.len()),
        )
    }

    #[cfg(any(test, feature = "fuzzing"))]
    #[doc(hidden)]
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.buffer.is_consistent()
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("row", &self.row())
            .field("input_line", &self.input_line())
            .field("cells", &DebugCells(self))
            .finish()
    }
}

struct DebugCells<'a>(&'a Row);

impl fmt::Debug for DebugCells<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.0.len()).map(|i| self.0.buffer.cell_text(i).unwrap_or_default()))
            .finish()
    }
}

impl PartialEq for Row {
    /// Rows are equal when their cell texts are.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && (0..self.len()).all(|i| self.buffer.cell_text(i) == other.buffer.cell_text(i))
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = Cell;
    type IntoIter = Cells<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the cells of a [`Row`].
#[derive(Debug, Clone)]
pub struct Cells<'a> {
    row: &'a Row,
    range: Range<usize>,
}

impl Iterator for Cells<'_> {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        self.range.next().map(|index| self.row.cell(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for Cells<'_> {
    fn next_back(&mut self) -> Option<Cell> {
        self.range.next_back().map(|index| self.row.cell(index))
    }
}

impl ExactSizeIterator for Cells<'_> {}

impl FusedIterator for Cells<'_> {}

#[cfg(feature = "serde")]
impl serde::Serialize for Row {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for index in 0..self.len() {
            seq.serialize_element(self.buffer.cell_text(index).unwrap_or_default())?;
        }
        seq.end()
    }
}
