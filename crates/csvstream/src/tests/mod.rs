mod read_good;

use alloc::{format, string::String, vec::Vec};

use crate::{CsvError, Reader, Specification};

/// Reads `text` to the end and renders every cell as `"text"@line:column`,
/// rows in brackets, followed by the reader's final position.
///
/// Also checks that each cell's logical coordinates match its place in the
/// output.
#[track_caller]
pub(crate) fn render(text: &str, spec: Specification) -> String {
    let mut reader = Reader::from_text(text, spec);
    let mut parts = Vec::new();
    for (i, row) in reader.by_ref().enumerate() {
        let row = row.unwrap_or_else(|err| panic!("{text:?}: {err}"));
        assert!(row.is_consistent());
        assert_eq!(row.row(), i, "row index in {text:?}");
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(j, cell)| {
                assert_eq!((cell.row(), cell.column()), (i, j), "coordinates in {text:?}");
                format!(
                    "{:?}@{}:{}",
                    cell.parse::<String>().unwrap(),
                    cell.input_line(),
                    cell.input_column()
                )
            })
            .collect();
        parts.push(format!("[{}]", cells.join(" ")));
    }
    parts.push(format!("eof@{}:{}", reader.input_line(), reader.input_column()));
    parts.join(" ")
}

/// Reads until the first error.
#[track_caller]
pub(crate) fn first_error(text: &str, spec: Specification) -> CsvError {
    let mut reader = Reader::from_text(text, spec);
    while let Some(row) = reader.next() {
        if let Err(err) = row {
            assert!(reader.next().is_none(), "reader continued after {err}");
            return err;
        }
    }
    panic!("{text:?} parsed without error");
}

#[track_caller]
pub(crate) fn assert_err_at(
    err: &CsvError,
    substr: &str,
    input: (usize, usize),
    cell: (usize, usize),
) {
    let msg = alloc::string::ToString::to_string(err);
    assert!(msg.contains(substr), "expected {substr:?} in {msg:?}");
    assert_eq!(
        (err.input_line(), err.input_column()),
        input,
        "input position of {msg}"
    );
    assert_eq!((err.row(), err.column()), cell, "cell position of {msg}");
}

pub(crate) fn semicolons() -> Specification {
    Specification::new()
        .without_separator(',')
        .with_separator(';')
}

pub(crate) fn whitespace_separated() -> Specification {
    Specification::new()
        .without_separators()
        .with_separators(" \t")
}
