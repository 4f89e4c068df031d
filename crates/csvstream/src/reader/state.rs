//! The tokenizer's states and its transition table.
//!
//! [`transition`] is pure: it maps the current state and the class of the
//! next character to the next state and the buffer edits to perform. The
//! reader applies the edits in order.

use super::classify::CharClass;
use crate::error::SyntaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// At the beginning of a line, before any cell.
    Start,
    /// After a separator; a cell slot is open but nothing was read into it.
    NextCol,
    /// After a whitespace separator; no cell slot is pending.
    WsBeforeNextCol,
    QuotedCol,
    /// Saw a quote inside a quoted cell: either its end or half of an escape.
    EscapedCol,
    /// Whitespace after a closed quoted cell.
    QuotedColRightWs,
    UnquotedCol,
    /// Whitespace inside an unquoted cell, held until we know whether it
    /// trails.
    UnquotedColRightWs,
    /// Comment after the cells of a row; the row closes at end of line.
    Comment,
    /// Comment covering a whole line; no row is produced.
    StartComment,
    End,
}

/// Buffer edits the reader performs on a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Opens a cell at the current character.
    OpenCell,
    /// Appends the current character.
    Append,
    /// Appends the current character as whitespace that may be trimmed.
    AppendTentative,
    /// Drops held trailing whitespace.
    RevertTentative,
    CloseCell,
    /// Adds an empty cell positioned at the start of the pending slot.
    CloseEmptyCell,
    /// Opens the next slot right after the current separator.
    NextSlot,
    CloseRow,
    /// Closes a zero-cell row when blank lines are significant.
    CloseBlankRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Transition {
    pub(crate) next: State,
    pub(crate) actions: &'static [Action],
}

impl Transition {
    const fn to(next: State, actions: &'static [Action]) -> Self {
        Self { next, actions }
    }
}

/// A transition that is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fault {
    UnterminatedQuote,
    UnexpectedAfterQuote,
    UnexpectedAfterWhitespace,
}

impl Fault {
    pub(crate) fn at(self, ch: Option<char>) -> SyntaxError {
        let ch = ch.unwrap_or(char::REPLACEMENT_CHARACTER);
        match self {
            Fault::UnterminatedQuote => SyntaxError::UnterminatedQuote,
            Fault::UnexpectedAfterQuote => SyntaxError::UnexpectedAfterQuote(ch),
            Fault::UnexpectedAfterWhitespace => SyntaxError::UnexpectedAfterWhitespace(ch),
        }
    }
}

#[allow(clippy::enum_glob_use, clippy::match_same_arms, clippy::too_many_lines)]
pub(crate) fn transition(state: State, class: CharClass) -> Result<Transition, Fault> {
    use Action::*;
    use CharClass::*;
    use State::*;

    let to = Transition::to;
    Ok(match (state, class) {
        (End, _) => to(End, &[]),

        (Start, Whitespace | WhitespaceSeparator) => to(Start, &[]),
        (Start, Separator) => to(NextCol, &[CloseEmptyCell, NextSlot]),
        (Start, Quote) => to(QuotedCol, &[OpenCell]),
        (Start, CommentChar) => to(StartComment, &[]),
        (Start, Newline) => to(Start, &[CloseBlankRow]),
        (Start, EndOfInput) => to(End, &[]),
        (Start, Other) => to(UnquotedCol, &[OpenCell, Append]),

        (NextCol | WsBeforeNextCol, Whitespace | WhitespaceSeparator) => to(state, &[]),
        (NextCol | WsBeforeNextCol, Quote) => to(QuotedCol, &[OpenCell]),
        (NextCol | WsBeforeNextCol, Other) => to(UnquotedCol, &[OpenCell, Append]),
        (NextCol | WsBeforeNextCol, Separator) => to(NextCol, &[CloseEmptyCell, NextSlot]),
        (NextCol, Newline) => to(Start, &[CloseEmptyCell, CloseRow]),
        (NextCol, CommentChar) => to(Comment, &[CloseEmptyCell]),
        (NextCol, EndOfInput) => to(End, &[CloseEmptyCell, CloseRow]),
        (WsBeforeNextCol, Newline) => to(Start, &[CloseRow]),
        (WsBeforeNextCol, CommentChar) => to(Comment, &[]),
        (WsBeforeNextCol, EndOfInput) => to(End, &[CloseRow]),

        (QuotedCol, Quote) => to(EscapedCol, &[]),
        (QuotedCol, EndOfInput) => return Err(Fault::UnterminatedQuote),
        (QuotedCol, _) => to(QuotedCol, &[Append]),

        (EscapedCol, Quote) => to(QuotedCol, &[Append]),
        (EscapedCol, Separator) => to(NextCol, &[CloseCell, NextSlot]),
        (EscapedCol, WhitespaceSeparator) => to(WsBeforeNextCol, &[CloseCell, NextSlot]),
        (EscapedCol, Whitespace) => to(QuotedColRightWs, &[CloseCell]),
        (EscapedCol, Newline) => to(Start, &[CloseCell, CloseRow]),
        (EscapedCol, CommentChar) => to(Comment, &[CloseCell]),
        (EscapedCol, EndOfInput) => to(End, &[CloseCell, CloseRow]),
        (EscapedCol, Other) => return Err(Fault::UnexpectedAfterQuote),

        (QuotedColRightWs, Whitespace) => to(QuotedColRightWs, &[]),
        (QuotedColRightWs, WhitespaceSeparator) => to(WsBeforeNextCol, &[NextSlot]),
        (QuotedColRightWs, Separator) => to(NextCol, &[NextSlot]),
        (QuotedColRightWs, Newline) => to(Start, &[CloseRow]),
        (QuotedColRightWs, CommentChar) => to(Comment, &[]),
        (QuotedColRightWs, EndOfInput) => to(End, &[CloseRow]),
        (QuotedColRightWs, Quote | Other) => return Err(Fault::UnexpectedAfterWhitespace),

        (UnquotedCol, Quote | Other) => to(UnquotedCol, &[Append]),
        (UnquotedCol, Whitespace) => to(UnquotedColRightWs, &[AppendTentative]),
        (UnquotedCol, Separator) => to(NextCol, &[CloseCell, NextSlot]),
        (UnquotedCol, WhitespaceSeparator) => to(WsBeforeNextCol, &[CloseCell, NextSlot]),
        (UnquotedCol, Newline) => to(Start, &[CloseCell, CloseRow]),
        (UnquotedCol, CommentChar) => to(Comment, &[CloseCell]),
        (UnquotedCol, EndOfInput) => to(End, &[CloseCell, CloseRow]),

        // Internal whitespace is kept; only a terminator drops it.
        (UnquotedColRightWs, Quote | Other) => to(UnquotedCol, &[Append]),
        (UnquotedColRightWs, Whitespace) => to(UnquotedColRightWs, &[AppendTentative]),
        (UnquotedColRightWs, Separator) => {
            to(NextCol, &[RevertTentative, CloseCell, NextSlot])
        }
        (UnquotedColRightWs, WhitespaceSeparator) => {
            to(WsBeforeNextCol, &[RevertTentative, CloseCell, NextSlot])
        }
        (UnquotedColRightWs, Newline) => to(Start, &[RevertTentative, CloseCell, CloseRow]),
        (UnquotedColRightWs, CommentChar) => to(Comment, &[RevertTentative, CloseCell]),
        (UnquotedColRightWs, EndOfInput) => to(End, &[RevertTentative, CloseCell, CloseRow]),

        (Comment, Newline) => to(Start, &[CloseRow]),
        (Comment, EndOfInput) => to(End, &[CloseRow]),
        (Comment, _) => to(Comment, &[]),

        (StartComment, Newline) => to(Start, &[]),
        (StartComment, EndOfInput) => to(End, &[]),
        (StartComment, _) => to(StartComment, &[]),
    })
}
