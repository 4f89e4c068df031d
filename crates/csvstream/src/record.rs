//! Typed rows.
//!
//! [`FromRow`] turns a whole [`Row`] into a value. Tuples read their fields
//! by position and `Vec<T>` reads every cell; any other type implements the
//! trait by hand, typically with [`Row::by_name`] and [`Cell::parse`].
//!
//! ```rust
//! use csvstream::{CsvError, FromRow, Reader, Row, Specification};
//!
//! struct Part {
//!     name: String,
//!     qty: u32,
//! }
//!
//! impl FromRow for Part {
//!     fn from_row(row: &Row) -> Result<Self, CsvError> {
//!         Ok(Part {
//!             name: row.by_name("name")?.parse()?,
//!             qty: row.by_name("qty")?.parse()?,
//!         })
//!     }
//! }
//!
//! let spec = Specification::new().with_header();
//! let parts: Vec<Part> = Reader::from_text("qty,name\n4,bolt\n10,nut\n", spec)
//!     .records::<Part>()
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(parts[1].name, "nut");
//! assert_eq!(parts.iter().map(|p| p.qty).sum::<u32>(), 14);
//! # Ok::<(), CsvError>(())
//! ```
//!
//! [`Cell::parse`]: crate::Cell::parse

use alloc::vec::Vec;
use core::{iter::FusedIterator, marker::PhantomData};

use crate::{convert::FromCell, error::CsvError, reader::Reader, row::Row, source::CharSource};

/// Builds a value from one row.
pub trait FromRow: Sized {
    /// Converts `row`.
    ///
    /// # Errors
    ///
    /// Any access or conversion error raised while reading the row's cells.
    fn from_row(row: &Row) -> Result<Self, CsvError>;
}

/// Every cell, in column order.
impl<T: FromCell + 'static> FromRow for Vec<T> {
    fn from_row(row: &Row) -> Result<Self, CsvError> {
        row.iter().map(|cell| cell.parse()).collect()
    }
}

macro_rules! impl_from_row_tuple {
    ($($ty:ident => $index:tt),+) => {
        /// Leading cells by position; extra cells are ignored.
        impl<$($ty: FromCell + 'static),+> FromRow for ($($ty,)+) {
            fn from_row(row: &Row) -> Result<Self, CsvError> {
                Ok(($(row.get($index)?.parse::<$ty>()?,)+))
            }
        }
    };
}

impl_from_row_tuple!(A => 0);
impl_from_row_tuple!(A => 0, B => 1);
impl_from_row_tuple!(A => 0, B => 1, C => 2);
impl_from_row_tuple!(A => 0, B => 1, C => 2, D => 3);
impl_from_row_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4);
impl_from_row_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
impl_from_row_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6);
impl_from_row_tuple!(A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7);

/// Iterator over typed rows, created by [`Reader::records`].
///
/// A row that fails to convert yields its error and iteration goes on with
/// the next row. A malformed input ends the iteration.
pub struct Records<S, T> {
    reader: Reader<S>,
    _marker: PhantomData<fn() -> T>,
}

impl<S: CharSource, T: FromRow> Records<S, T> {
    pub(crate) fn new(reader: Reader<S>) -> Self {
        Self {
            reader,
            _marker: PhantomData,
        }
    }

    /// The underlying reader.
    #[must_use]
    pub fn reader(&self) -> &Reader<S> {
        &self.reader
    }

    /// Gives the reader back, with its position and column names.
    #[must_use]
    pub fn into_reader(self) -> Reader<S> {
        self.reader
    }
}

impl<S: CharSource, T: FromRow> Iterator for Records<S, T> {
    type Item = Result<T, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader
            .next()
            .map(|row| row.and_then(|row| T::from_row(&row)))
    }
}

impl<S: CharSource, T: FromRow> FusedIterator for Records<S, T> {}
