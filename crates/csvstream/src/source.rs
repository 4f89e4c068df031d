//! Forward-only character sources a [`Reader`](crate::Reader) can consume.

use crate::error::SourceError;

/// A single-pass supply of characters.
///
/// Every `Iterator<Item = char>` is a source. Fallible sources, such as
/// [`IoSource`], report their failures through [`SourceError`].
pub trait CharSource {
    /// The next character, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// A [`SourceError`] when the underlying input fails. The reader stops
    /// at the first error.
    fn next_char(&mut self) -> Result<Option<char>, SourceError>;
}

impl<I: Iterator<Item = char>> CharSource for I {
    #[inline]
    fn next_char(&mut self) -> Result<Option<char>, SourceError> {
        Ok(self.next())
    }
}

/// Decodes UTF-8 from a byte slice. Invalid sequences decode to U+FFFD.
#[derive(Debug, Clone)]
pub struct Utf8Bytes<'a> {
    bytes: &'a [u8],
}

impl<'a> Utf8Bytes<'a> {
    /// Decodes `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl Iterator for Utf8Bytes<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        if self.bytes.is_empty() {
            return None;
        }
        let (ch, len) = bstr::decode_utf8(self.bytes);
        self.bytes = &self.bytes[len..];
        Some(ch.unwrap_or(char::REPLACEMENT_CHARACTER))
    }
}

#[cfg(feature = "std")]
pub use io::IoSource;

#[cfg(feature = "std")]
mod io {
    use alloc::{vec, vec::Vec};
    use std::io::{ErrorKind, Read};

    use super::CharSource;
    use crate::error::SourceError;

    const CHUNK: usize = 8 * 1024;

    /// Decodes UTF-8 from any [`Read`], one chunk at a time.
    ///
    /// Multi-byte sequences split across chunk boundaries are reassembled.
    /// Invalid sequences decode to U+FFFD.
    #[derive(Debug)]
    pub struct IoSource<R> {
        inner: R,
        buf: Vec<u8>,
        pos: usize,
        end: usize,
        eof: bool,
    }

    impl<R: Read> IoSource<R> {
        /// Reads from `inner`.
        pub fn new(inner: R) -> Self {
            Self {
                inner,
                buf: vec![0; CHUNK],
                pos: 0,
                end: 0,
                eof: false,
            }
        }

        /// Returns the wrapped reader. Buffered, undecoded bytes are lost.
        pub fn into_inner(self) -> R {
            self.inner
        }

        fn refill(&mut self) -> Result<(), SourceError> {
            self.buf.copy_within(self.pos..self.end, 0);
            self.end -= self.pos;
            self.pos = 0;
            loop {
                match self.inner.read(&mut self.buf[self.end..]) {
                    Ok(0) => {
                        self.eof = true;
                        return Ok(());
                    }
                    Ok(n) => {
                        self.end += n;
                        return Ok(());
                    }
                    Err(err) if err.kind() == ErrorKind::Interrupted => {}
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    impl<R: Read> CharSource for IoSource<R> {
        fn next_char(&mut self) -> Result<Option<char>, SourceError> {
            loop {
                let pending = &self.buf[self.pos..self.end];
                if pending.is_empty() {
                    if self.eof {
                        return Ok(None);
                    }
                } else {
                    let (ch, len) = bstr::decode_utf8(pending);
                    // A short invalid tail may be the start of a sequence
                    // that continues in the next chunk.
                    let settled =
                        ch.is_some() || self.eof || len < pending.len() || pending.len() >= 4;
                    if settled {
                        self.pos += len;
                        return Ok(Some(ch.unwrap_or(char::REPLACEMENT_CHARACTER)));
                    }
                }
                self.refill()?;
            }
        }
    }
}
