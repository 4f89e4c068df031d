#![expect(missing_docs)]

use std::io::{self, Cursor, Read};

use csvstream::{ErrorKind, Reader, Row, Specification};
use rstest::rstest;

/// Hands out at most `chunk` bytes per read, and an interruption before
/// every read.
struct Trickle<'a> {
    data: &'a [u8],
    chunk: usize,
    interrupt: bool,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

const TEXT: &str = "città, prezzo\n\"Zürich\", 12,5\nKøbenhavn , 9\n";

fn read_all<R: Read>(reader: R) -> Vec<Row> {
    Reader::from_reader(reader, Specification::new())
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn cursor_matches_text() {
    let from_text: Vec<Row> = Reader::from_text(TEXT, Specification::new())
        .collect::<Result<_, _>>()
        .unwrap();
    let from_io = read_all(Cursor::new(TEXT));
    assert_eq!(from_io, from_text);
    assert_eq!(from_io[2].get(0).unwrap(), "København");
    assert_eq!(from_io[2].get(1).unwrap().input_column(), 12);
}

#[rstest]
#[case::bytewise(1)]
#[case::splits_multibyte(2)]
#[case::odd(3)]
#[case::large(4096)]
fn chunked_reads_reassemble_characters(#[case] chunk: usize) {
    let rows = read_all(Trickle {
        data: TEXT.as_bytes(),
        chunk,
        interrupt: false,
    });
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get(0).unwrap(), "città");
    assert_eq!(rows[1].get(0).unwrap(), "Zürich");
    assert_eq!(rows[1].get(2).unwrap().parse::<u8>().unwrap(), 5);
}

#[test]
fn invalid_bytes_read_as_replacement() {
    let rows = read_all(Cursor::new(b"a\xffb,\xe2\x82\n".to_vec()));
    assert_eq!(rows[0].get(0).unwrap(), "a\u{fffd}b");
    assert_eq!(rows[0].get(1).unwrap(), "\u{fffd}");
}

#[test]
fn read_failure_is_a_source_error() {
    let mut reader = Reader::from_reader(Broken, Specification::new());
    let err = reader.next().unwrap().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Source(e) if e.message() == "disk on fire"));
    assert_eq!(err.to_string(), "input source error: disk on fire at input 0:0, cell 0:0");
    assert!(reader.next().is_none());
}

#[test]
fn large_input_spans_many_buffers() {
    let mut text = String::new();
    for i in 0..5_000 {
        text.push_str(&format!("{i},\"ü {i}\"\n"));
    }
    let rows = read_all(Cursor::new(text));
    assert_eq!(rows.len(), 5_000);
    let last = rows.last().unwrap();
    assert_eq!(last.get(0).unwrap().parse::<u32>().unwrap(), 4_999);
    assert_eq!(last.get(1).unwrap(), "ü 4999");
    assert_eq!(last.input_line(), 4_999);
}
