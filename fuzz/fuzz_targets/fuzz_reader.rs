#![no_main]
use std::cell::RefCell;
use std::io::Read;

use arbitrary::{Arbitrary, Unstructured};
use csvstream::{Reader, Row, Specification};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 5; // 1 flag byte + 4-byte split seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Fragments that exercise every character class of the tokenizer.
static TOKEN_TABLE: &[&[u8]] = &[
    b",",
    b";",
    b"\"",
    b"\"\"",
    b"'",
    b"#",
    b" ",
    b"\t",
    b"\n",
    b"\r",
    b"\r\n",
    b"abc",
    b"12.5",
    "ä".as_bytes(),
    "\u{2028}".as_bytes(),
    b"\xff",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x3F); // 6 bits
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1).min(max_size) {
            let limit = max_size - prefix;
            let written = if with_rng(|rng| rng.random_bool(0.5)) {
                append_token(&mut data[prefix..], limit)
            } else {
                append_table(&mut data[prefix..], size, limit)
            };
            if written == 0 {
                break;
            }
            prefix += written;
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Appends one fragment from [`TOKEN_TABLE`] if it fits in `limit`.
fn append_token(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        let token = TOKEN_TABLE[rng.random_range(0..TOKEN_TABLE.len())];
        if token.len() > limit {
            return 0;
        }
        buf[..token.len()].copy_from_slice(token);
        token.len()
    })
}

/// Appends a well-formed table of arbitrary cells, cut at `limit`.
fn append_table(buf: &mut [u8], size: usize, limit: usize) -> usize {
    let table = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..=size * 2));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(table) = ArbitraryTable::arbitrary(&mut Unstructured::new(&bytes)) {
            break table;
        }
    };
    let text = table.to_csv();
    let len = text.len().min(limit);
    buf[..len].copy_from_slice(&text.as_bytes()[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// Rows of cells, written fully quoted with `"` and `,`.
#[derive(Debug, Arbitrary)]
struct ArbitraryTable(Vec<Vec<String>>);

impl ArbitraryTable {
    fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in &self.0 {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
                .collect();
            out.push_str(&cells.join(","));
            out.push('\n');
        }
        out
    }
}

fn specification(flags: u8) -> Specification {
    // Two bits pick the separators.
    let mut spec = match flags & 3 {
        0 => Specification::new(),
        1 => Specification::new().without_separator(',').with_separator(';'),
        2 => Specification::new().with_separator(';'),
        _ => Specification::new().without_separators().with_separators(" \t"),
    };
    if flags & 4 != 0 {
        spec = spec.with_quote('\'');
    }
    if flags & 8 != 0 {
        spec = spec.with_comment('#');
    }
    if flags & 16 != 0 {
        spec = spec.with_header();
    }
    if flags & 32 != 0 {
        spec = spec.with_blank_lines_significant();
    }
    spec
}

/// Hands out the input in chunks whose sizes derive from a seed, ignoring
/// UTF-8 boundaries.
struct Chunked<'a> {
    data: &'a [u8],
    seed: u64,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.data.is_empty() {
            return Ok(0);
        }
        self.seed = self.seed.rotate_left(7) ^ 0x9e37_79b9;
        let n = (self.seed as usize % self.data.len() + 1).min(buf.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

fn check_rows<I>(rows: I) -> Vec<Result<Row, String>>
where
    I: Iterator<Item = Result<Row, csvstream::CsvError>>,
{
    let mut out = Vec::new();
    let mut last_line = 0;
    for row in rows {
        match row {
            Ok(row) => {
                assert!(row.is_consistent());
                assert!(row.input_line() >= last_line);
                last_line = row.input_line();
                let mut last = None;
                for (column, cell) in row.iter().enumerate() {
                    assert_eq!(cell.column(), column);
                    assert_eq!(cell.row(), row.row());
                    let position = cell.input_position();
                    assert!(last.is_none_or(|last| last <= position));
                    last = Some(position);
                }
                out.push(Ok(row));
            }
            Err(err) => out.push(Err(err.to_string())),
        }
    }
    out
}

fn reader(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes([data[1], data[2], data[3], data[4]]));
    let data = &data[HEADER..];

    let spec = specification(flags);
    let from_bytes = check_rows(Reader::from_bytes(data, spec.clone()));
    let from_io = check_rows(Reader::from_reader(
        Chunked {
            data,
            seed: split_seed,
        },
        spec,
    ));
    assert_eq!(from_bytes, from_io);
}

fuzz_target!(|data: &[u8]| reader(data));
