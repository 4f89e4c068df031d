//! A streaming, position-aware tokenizer for CSV and CSV-like dialects.
//!
//! [`Reader`] consumes a forward-only character source exactly once and
//! yields [`Row`]s of [`Cell`]s. Cells are handles into a shared, immutable
//! row buffer: they cost nothing to clone, outlive the row that produced
//! them, and convert their text to typed values only when asked.
//!
//! Every row and cell knows where it came from, both as a raw input
//! line/column and as a logical row/column, and every error carries the same
//! coordinates.
//!
//! ```rust
//! use csvstream::{Reader, Specification};
//!
//! let spec = Specification::new().with_comment('#');
//! let mut rows = Reader::from_text("a, \"b \"\"c\"\"\" # note\n\n 1 ,2.5\n", spec);
//!
//! let first = rows.next().unwrap()?;
//! assert_eq!(first.get(1)?.as_str()?, "b \"c\"");
//!
//! let second = rows.next().unwrap()?;
//! assert_eq!(second.get(0)?.parse::<i32>()?, 1);
//! assert_eq!(second.input_line(), 2);
//! assert_eq!(second.row(), 1);
//! assert!(rows.next().is_none());
//! # Ok::<(), csvstream::CsvError>(())
//! ```
//!
//! The crate is `no_std` with `alloc`. The `std` feature (on by default) adds
//! [`Reader::from_reader`] for any [`std::io::Read`].

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod buffer;
mod cell;
mod convert;
mod error;
mod position;
mod reader;
mod record;
mod row;
mod source;
mod specification;

#[cfg(test)]
mod tests;

pub use cell::Cell;
pub use convert::FromCell;
pub use error::{
    ConversionFailure, CsvError, ErrorKind, Location, SourceError, SyntaxError, TargetType,
};
pub use position::InputPosition;
pub use reader::Reader;
pub use record::{FromRow, Records};
pub use row::{Cells, Row};
#[cfg(feature = "std")]
pub use source::IoSource;
pub use source::{CharSource, Utf8Bytes};
pub use specification::{Locale, Specification};
