//! The streaming tokenizer.
//!
//! A [`Reader`] pulls one character at a time from a [`CharSource`],
//! classifies it under the [`Specification`], and feeds the class through a
//! pure transition table. The resulting edits build the current row in a
//! private [`RowBuffer`]; when a row terminator arrives the buffer is frozen
//! behind an `Arc` and handed out as a [`Row`].
//!
//! Rows alternate between two buffers. The reader keeps a handle to the last
//! published buffer and takes it back for the next row once every `Row` and
//! `Cell` referring to it is gone; otherwise it allocates a fresh one. A
//! published buffer is never written again.

mod classify;
mod state;


use alloc::sync::Arc;
use core::{iter::FusedIterator, mem};

use tracing::{debug, trace};

use self::{
    classify::{CharClass, classify},
    state::{Action, State, Transition, transition},
};
use crate::{
    buffer::RowBuffer,
    error::{CsvError, ErrorKind, Location},
    position::InputPosition,
    record::{FromRow, Records},
    row::Row,
    source::{CharSource, Utf8Bytes},
    specification::Specification,
};

/// Reads rows from a character source.
///
/// `Reader` is an [`Iterator`] over `Result<Row, CsvError>`. It stops after
/// the first error.
///
/// ```rust
/// use csvstream::{Reader, Specification};
///
/// let spec = Specification::new().with_header();
/// let text = "name, qty\nbolt, 4\n\"nut, hex\", 10\n";
/// let mut total = 0;
/// for row in Reader::from_text(text, spec) {
///     let row = row?;
///     total += row.by_name("qty")?.parse::<u32>()?;
/// }
/// assert_eq!(total, 14);
/// # Ok::<(), csvstream::CsvError>(())
/// ```
pub struct Reader<S> {
    source: S,
    /// Character read while looking for the `\n` of a `\r\n` pair.
    lookahead: Option<char>,
    exhausted: bool,
    spec: Arc<Specification>,
    state: State,
    /// Position of the next character.
    pos: InputPosition,
    /// Where an empty cell in the pending slot would be positioned.
    slot: InputPosition,
    /// Logical index of the slot being read.
    column: usize,
    /// Rows produced so far, header included.
    rows: usize,
    building: RowBuffer,
    published: Option<Arc<RowBuffer>>,
    header_pending: bool,
    failed: bool,
}

impl<S: CharSource> Reader<S> {
    /// Reads `source` under `spec`.
    ///
    /// Nothing is read until the first row is requested. With a header, the
    /// header is read along with the first row, or explicitly with
    /// [`read_header`](Self::read_header).
    pub fn new(source: S, spec: Specification) -> Self {
        let mut building = RowBuffer::new();
        building.reset(0, 0);
        Self {
            source,
            lookahead: None,
            exhausted: false,
            header_pending: spec.has_header(),
            spec: Arc::new(spec),
            state: State::Start,
            pos: InputPosition::default(),
            slot: InputPosition::default(),
            column: 0,
            rows: 0,
            building,
            published: None,
            failed: false,
        }
    }

    /// The dialect, including column names read from the header so far.
    #[must_use]
    pub fn specification(&self) -> &Arc<Specification> {
        &self.spec
    }

    /// Line of the next character to read.
    #[must_use]
    pub fn input_line(&self) -> usize {
        self.pos.line
    }

    /// Column of the next character to read.
    #[must_use]
    pub fn input_column(&self) -> usize {
        self.pos.column
    }

    /// Position of the next character to read. After the last row this is
    /// the end of input.
    #[must_use]
    pub fn input_position(&self) -> InputPosition {
        self.pos
    }

    /// Number of rows produced so far, the header row included.
    #[must_use]
    pub fn row(&self) -> usize {
        self.rows
    }

    /// Consumes the header row if the dialect has one and it was not read
    /// yet. Does nothing otherwise.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::DuplicateColumn`] if a header name collides with another
    /// header name or a declared column, or any error raised while reading
    /// the row. The reader is finished afterwards.
    pub fn read_header(&mut self) -> Result<(), CsvError> {
        if !self.header_pending {
            return Ok(());
        }
        self.header_pending = false;
        let result = match self.read_row() {
            Ok(Some(row)) => self.apply_header(&row),
            Ok(None) => Ok(()),
            Err(err) => Err(err),
        };
        if result.is_err() {
            self.fail();
        }
        result
    }

    /// Converts every remaining row with `T`'s [`FromRow`] implementation.
    pub fn records<T: FromRow>(self) -> Records<S, T> {
        Records::new(self)
    }

    fn apply_header(&mut self, header: &Row) -> Result<(), CsvError> {
        let spec = Arc::make_mut(&mut self.spec);
        for cell in header {
            spec.bind_column(cell.column(), cell.as_str()?, cell.location())?;
        }
        debug!(columns = header.len(), line = header.input_line(), "read header row");
        Ok(())
    }

    fn fail(&mut self) {
        self.failed = true;
        self.state = State::End;
    }

    /// Steps the state machine until a row closes or input ends.
    fn read_row(&mut self) -> Result<Option<Row>, CsvError> {
        while self.state != State::End {
            if let Some(row) = self.step()? {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    fn step(&mut self) -> Result<Option<Row>, CsvError> {
        let at = self.pos;
        let ch = self.read_char()?;
        let class = classify(ch, &self.spec);
        let Transition { next, actions } = transition(self.state, class).map_err(|fault| {
            let err = CsvError::new(fault.at(ch), self.location(at));
            debug!(%err, "malformed input");
            err
        })?;

        let mut row = None;
        for action in actions {
            match action {
                Action::OpenCell => self.building.open_cell(at),
                Action::Append => {
                    if let Some(ch) = ch {
                        self.building.push(ch);
                    }
                }
                Action::AppendTentative => {
                    if let Some(ch) = ch {
                        self.building.push_tentative(ch, at);
                    }
                }
                Action::RevertTentative => self.building.revert_tentative(),
                Action::CloseCell => self.building.close_cell(at),
                Action::CloseEmptyCell => self.building.push_empty_cell(self.slot),
                Action::NextSlot => {
                    self.slot = self.pos;
                    self.column += 1;
                }
                Action::CloseRow => row = Some(self.publish(at)?),
                Action::CloseBlankRow => {
                    if self.spec.blank_lines_significant() {
                        row = Some(self.publish(at)?);
                    }
                }
            }
        }
        self.state = next;
        if class == CharClass::Newline && next == State::Start {
            self.begin_line();
        }
        Ok(row)
    }

    /// Reads one character, folding `\r\n` and a lone `\r` into `\n`.
    fn read_char(&mut self) -> Result<Option<char>, CsvError> {
        let ch = match self.lookahead.take() {
            Some(ch) => Some(ch),
            None => self.pull()?,
        };
        let ch = match ch {
            Some('\r') => {
                match self.pull()? {
                    Some('\n') | None => {}
                    Some(other) => self.lookahead = Some(other),
                }
                Some('\n')
            }
            other => other,
        };
        if let Some(ch) = ch {
            self.pos.advance(ch);
        }
        Ok(ch)
    }

    fn pull(&mut self) -> Result<Option<char>, CsvError> {
        if self.exhausted {
            return Ok(None);
        }
        let ch = self
            .source
            .next_char()
            .map_err(|err| CsvError::new(ErrorKind::Source(err), self.location(self.pos)))?;
        self.exhausted = ch.is_none();
        Ok(ch)
    }

    fn begin_line(&mut self) {
        self.slot = self.pos;
        self.column = 0;
        self.building.reset(self.rows, self.pos.line);
    }

    fn location(&self, at: InputPosition) -> Location {
        Location::new(at, self.rows, self.column)
    }

    /// Freezes the current buffer into a row and prepares the next one.
    fn publish(&mut self, end: InputPosition) -> Result<Row, CsvError> {
        self.building.finish(end);
        let width = self.building.len();
        if width > self.spec.column_count() {
            let location = self.location(end);
            Arc::make_mut(&mut self.spec)
                .add_column_if_not_exists(width - 1)
                .map_err(|err| CsvError::new(err.kind, location))?;
        }

        let next = self.recycle();
        let buffer = Arc::new(mem::replace(&mut self.building, next));
        self.published = Some(buffer.clone());
        trace!(
            row = self.rows,
            cells = width,
            line = buffer.input_line(),
            "published row"
        );
        self.rows += 1;
        self.building.reset(self.rows, self.pos.line);
        Ok(Row::new(buffer, self.spec.clone()))
    }

    fn recycle(&mut self) -> RowBuffer {
        match self.published.take().map(Arc::try_unwrap) {
            Some(Ok(buffer)) => {
                trace!("reusing row buffer");
                buffer
            }
            Some(Err(_)) => {
                trace!("previous row still referenced, allocating row buffer");
                RowBuffer::new()
            }
            None => RowBuffer::new(),
        }
    }
}

impl<'a> Reader<core::str::Chars<'a>> {
    /// Reads rows from `text`.
    pub fn from_text(text: &'a str, spec: Specification) -> Self {
        Self::new(text.chars(), spec)
    }
}

impl<'a> Reader<Utf8Bytes<'a>> {
    /// Reads rows from UTF-8 `bytes`. Invalid sequences read as U+FFFD.
    pub fn from_bytes(bytes: &'a [u8], spec: Specification) -> Self {
        Self::new(Utf8Bytes::new(bytes), spec)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Reader<crate::source::IoSource<R>> {
    /// Reads rows from UTF-8 data supplied by `reader`.
    pub fn from_reader(reader: R, spec: Specification) -> Self {
        Self::new(crate::source::IoSource::new(reader), spec)
    }
}

impl<S: CharSource> Iterator for Reader<S> {
    type Item = Result<Row, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Err(err) = self.read_header() {
            return Some(Err(err));
        }
        match self.read_row() {
            Ok(row) => row.map(Ok),
            Err(err) => {
                self.fail();
                Some(Err(err))
            }
        }
    }
}

impl<S: CharSource> FusedIterator for Reader<S> {}

impl<S> core::fmt::Debug for Reader<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reader")
            .field("state", &self.state)
            .field("position", &self.pos)
            .field("rows", &self.rows)
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}
