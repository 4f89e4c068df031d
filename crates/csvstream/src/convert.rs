//! Scalar conversion of cell text.
//!
//! A [`Cell`](crate::Cell) never interprets its content by itself; it hands
//! its text and the specification's [`Locale`] to a [`FromCell`]
//! implementation chosen by the target type. Callers can add their own
//! target types, or bypass the trait with
//! [`Cell::parse_with`](crate::Cell::parse_with).

use alloc::{borrow::Cow, boxed::Box, string::String, sync::Arc};
use core::num::IntErrorKind;

use crate::{error::ConversionFailure, specification::Locale};

/// Converts the text of one cell into `Self`.
///
/// Implementations skip leading whitespace, accept only spaces and tabs
/// after the value, and fail on anything else.
pub trait FromCell: Sized {
    /// Parses `text` under `locale`.
    ///
    /// # Errors
    ///
    /// A [`ConversionFailure`] describing why no value could be produced.
    fn from_cell(text: &str, locale: &Locale) -> Result<Self, ConversionFailure>;
}

/// The value with leading whitespace and trailing blanks removed.
fn scalar_body(text: &str) -> Result<&str, ConversionFailure> {
    let body = text.trim_start().trim_end_matches([' ', '\t']);
    if body.is_empty() {
        Err(ConversionFailure::Empty)
    } else {
        Ok(body)
    }
}

fn sign_len(body: &str) -> usize {
    usize::from(body.starts_with(['+', '-']))
}

fn digits_len(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

/// Length of the longest prefix of `body` that reads as an integer, or zero.
fn integer_prefix(body: &str) -> usize {
    let sign = sign_len(body);
    match digits_len(&body[sign..]) {
        0 => 0,
        digits => sign + digits,
    }
}

/// Length of the longest prefix of `body` that reads as a decimal number
/// with `decimal` as the fraction separator, or zero.
fn float_prefix(body: &str, decimal: char) -> usize {
    let mut at = sign_len(body);
    let integral = digits_len(&body[at..]);
    at += integral;
    let mut fraction = 0;
    if body[at..].starts_with(decimal) {
        fraction = digits_len(&body[at + decimal.len_utf8()..]);
        if integral + fraction > 0 {
            at += decimal.len_utf8() + fraction;
        }
    }
    if integral + fraction == 0 {
        return 0;
    }
    if body[at..].starts_with(['e', 'E']) {
        let exp_start = at + 1;
        let exp_sign = sign_len(&body[exp_start..]);
        let exp_digits = digits_len(&body[exp_start + exp_sign..]);
        if exp_digits > 0 {
            at = exp_start + exp_sign + exp_digits;
        }
    }
    at
}

fn whole_prefix(body: &str, prefix: usize) -> Result<&str, ConversionFailure> {
    if prefix == 0 {
        Err(ConversionFailure::Invalid)
    } else if prefix < body.len() {
        Err(ConversionFailure::TrailingCharacters)
    } else {
        Ok(body)
    }
}

macro_rules! impl_from_cell_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromCell for $ty {
                fn from_cell(text: &str, _locale: &Locale) -> Result<Self, ConversionFailure> {
                    let body = scalar_body(text)?;
                    let digits = whole_prefix(body, integer_prefix(body))?;
                    digits.parse::<$ty>().map_err(|err| match err.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            ConversionFailure::OutOfRange
                        }
                        _ => ConversionFailure::Invalid,
                    })
                }
            }
        )*
    };
}

impl_from_cell_int!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

macro_rules! impl_from_cell_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromCell for $ty {
                fn from_cell(text: &str, locale: &Locale) -> Result<Self, ConversionFailure> {
                    let decimal = locale.decimal_separator;
                    let body = scalar_body(text)?;
                    let number = whole_prefix(body, float_prefix(body, decimal))?;
                    let number: Cow<'_, str> = if decimal == '.' {
                        Cow::Borrowed(number)
                    } else {
                        Cow::Owned(number.replace(decimal, "."))
                    };
                    number
                        .parse::<$ty>()
                        .map_err(|_| ConversionFailure::Invalid)
                }
            }
        )*
    };
}

impl_from_cell_float!(f32, f64);

impl FromCell for bool {
    fn from_cell(text: &str, _locale: &Locale) -> Result<Self, ConversionFailure> {
        let body = scalar_body(text)?;
        if body == "1" || body.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if body == "0" || body.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConversionFailure::Invalid)
        }
    }
}

impl FromCell for char {
    fn from_cell(text: &str, _locale: &Locale) -> Result<Self, ConversionFailure> {
        let mut chars = scalar_body(text)?.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            (Some(_), Some(_)) => Err(ConversionFailure::TrailingCharacters),
            (None, _) => Err(ConversionFailure::Empty),
        }
    }
}

impl FromCell for String {
    fn from_cell(text: &str, _locale: &Locale) -> Result<Self, ConversionFailure> {
        Ok(text.into())
    }
}

impl FromCell for Box<str> {
    fn from_cell(text: &str, _locale: &Locale) -> Result<Self, ConversionFailure> {
        Ok(text.into())
    }
}

impl FromCell for Arc<str> {
    fn from_cell(text: &str, _locale: &Locale) -> Result<Self, ConversionFailure> {
        Ok(text.into())
    }
}

/// Whitespace-only content converts to `None`.
impl<T: FromCell> FromCell for Option<T> {
    fn from_cell(text: &str, locale: &Locale) -> Result<Self, ConversionFailure> {
        if text.trim().is_empty() {
            Ok(None)
        } else {
            T::from_cell(text, locale).map(Some)
        }
    }
}
