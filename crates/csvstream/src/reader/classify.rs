use crate::specification::Specification;

/// What a character means under a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// Space or tab that is not a separator.
    Whitespace,
    /// A separator that is not whitespace.
    Separator,
    /// Space or tab declared as a separator. States that skip padding treat
    /// it as whitespace, states that end a cell treat it as a separator.
    WhitespaceSeparator,
    Quote,
    /// `\n`. A `\r\n` pair or a lone `\r` arrive here already folded to `\n`.
    Newline,
    CommentChar,
    EndOfInput,
    Other,
}

#[inline]
pub(crate) fn classify(ch: Option<char>, spec: &Specification) -> CharClass {
    let Some(ch) = ch else {
        return CharClass::EndOfInput;
    };
    if ch == '\n' {
        return CharClass::Newline;
    }
    let whitespace = ch == ' ' || ch == '\t';
    match (whitespace, spec.is_separator(ch)) {
        (true, true) => CharClass::WhitespaceSeparator,
        (true, false) => CharClass::Whitespace,
        (false, true) => CharClass::Separator,
        (false, false) if ch == spec.quote() => CharClass::Quote,
        (false, false) if spec.comment() == Some(ch) => CharClass::CommentChar,
        (false, false) => CharClass::Other,
    }
}
