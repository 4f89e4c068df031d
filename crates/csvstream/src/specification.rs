//! Dialect configuration shared by a [`Reader`](crate::Reader) and every
//! [`Row`](crate::Row) and [`Cell`](crate::Cell) it produces.

use alloc::{collections::BTreeMap, sync::Arc, vec::Vec};

use crate::error::{CsvError, ErrorKind, Location};

/// Describes how raw text is split into rows and cells.
///
/// A `Specification` is assembled by the caller with the `with_*` builder
/// methods, then handed to a reader. From then on it is shared read-only,
/// except that the reader may append anonymous columns as it discovers wider
/// rows.
///
/// ```rust
/// use csvstream::Specification;
///
/// let spec = Specification::new()
///     .with_separator(';')
///     .with_comment('#')
///     .with_header();
/// assert!(spec.is_separator(';'));
/// assert!(spec.is_separator(','));
/// assert_eq!(spec.default_separator(), Some(','));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    /// Characters that end a cell.
    ///
    /// Any of them is accepted while reading.
    ///
    /// # Default
    ///
    /// `[',']`
    separators: Vec<char>,

    /// The separator a writer would use.
    ///
    /// The first separator added to an empty set becomes the default.
    ///
    /// # Default
    ///
    /// `Some(',')`
    default_separator: Option<char>,

    /// Opens and closes quoted cells. Doubled inside a quoted cell, it stands
    /// for itself.
    ///
    /// # Default
    ///
    /// `'"'`
    quote: char,

    /// Starts a comment that runs to the end of the line.
    ///
    /// # Default
    ///
    /// `None`
    comment: Option<char>,

    /// Whether the first row names the columns instead of carrying data.
    ///
    /// # Default
    ///
    /// `false`
    header: bool,

    /// Whether an empty line produces an empty row instead of being skipped.
    ///
    /// # Default
    ///
    /// `false`
    blank_lines_significant: bool,

    /// Conventions used when converting cell content to scalars.
    ///
    /// # Default
    ///
    /// [`Locale::default`]
    locale: Locale,

    columns: ColumnMap,
}

impl Default for Specification {
    fn default() -> Self {
        Self {
            separators: alloc::vec![','],
            default_separator: Some(','),
            quote: '"',
            comment: None,
            header: false,
            blank_lines_significant: false,
            locale: Locale::default(),
            columns: ColumnMap::default(),
        }
    }
}

impl Specification {
    /// The default dialect: comma separated, double-quoted, no header.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Separators
    // ---------------------------------------------------------------------

    /// Adds `separator` to the separator set.
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.add_separator(separator);
        self
    }

    /// Adds every character of `separators` to the separator set.
    #[must_use]
    pub fn with_separators(mut self, separators: &str) -> Self {
        for separator in separators.chars() {
            self.add_separator(separator);
        }
        self
    }

    /// Removes `separator` from the separator set.
    ///
    /// If it was the default separator, the first remaining separator takes
    /// its place.
    #[must_use]
    pub fn without_separator(mut self, separator: char) -> Self {
        self.separators.retain(|&s| s != separator);
        if self.default_separator == Some(separator) {
            self.default_separator = self.separators.first().copied();
        }
        self
    }

    /// Clears the separator set.
    #[must_use]
    pub fn without_separators(mut self) -> Self {
        self.separators.clear();
        self.default_separator = None;
        self
    }

    fn add_separator(&mut self, separator: char) {
        if self.separators.contains(&separator) {
            return;
        }
        if self.separators.is_empty() {
            self.default_separator = Some(separator);
        }
        self.separators.push(separator);
    }

    /// All recognized separators, in insertion order.
    #[must_use]
    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    /// The designated default separator, if any separator is set.
    #[must_use]
    pub fn default_separator(&self) -> Option<char> {
        self.default_separator
    }

    /// Whether `ch` ends a cell.
    #[inline]
    #[must_use]
    pub fn is_separator(&self, ch: char) -> bool {
        self.separators.contains(&ch)
    }

    // ---------------------------------------------------------------------
    // Toggles
    // ---------------------------------------------------------------------

    /// Uses `quote` as the quote character.
    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// The quote character.
    #[must_use]
    pub fn quote(&self) -> char {
        self.quote
    }

    /// Treats `comment` as the start of a line comment.
    #[must_use]
    pub fn with_comment(mut self, comment: char) -> Self {
        self.comment = Some(comment);
        self
    }

    /// Disables comments.
    #[must_use]
    pub fn without_comment(mut self) -> Self {
        self.comment = None;
        self
    }

    /// The comment character, if comments are enabled.
    #[must_use]
    pub fn comment(&self) -> Option<char> {
        self.comment
    }

    /// Reads the first row as column names.
    #[must_use]
    pub fn with_header(mut self) -> Self {
        self.header = true;
        self
    }

    /// Treats the first row as data.
    #[must_use]
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }

    /// Whether the first row names the columns.
    #[must_use]
    pub fn has_header(&self) -> bool {
        self.header
    }

    /// Makes empty lines produce empty rows.
    #[must_use]
    pub fn with_blank_lines_significant(mut self) -> Self {
        self.blank_lines_significant = true;
        self
    }

    /// Skips empty lines.
    #[must_use]
    pub fn without_blank_lines_significant(mut self) -> Self {
        self.blank_lines_significant = false;
        self
    }

    /// Whether empty lines produce empty rows.
    #[must_use]
    pub fn blank_lines_significant(&self) -> bool {
        self.blank_lines_significant
    }

    /// Uses `locale` for scalar conversions.
    #[must_use]
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Uses `separator` as the decimal separator for scalar conversions.
    #[must_use]
    pub fn with_decimal_separator(mut self, separator: char) -> Self {
        self.locale.decimal_separator = separator;
        self
    }

    /// Conventions used for scalar conversions.
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    // ---------------------------------------------------------------------
    // Columns
    // ---------------------------------------------------------------------

    /// Builder form of [`declare_column`](Self::declare_column).
    ///
    /// # Errors
    ///
    /// See [`declare_column`](Self::declare_column).
    pub fn with_column(mut self, index: usize, name: &str) -> Result<Self, CsvError> {
        self.declare_column(index, name)?;
        Ok(self)
    }

    /// Binds `name` to column `index`.
    ///
    /// Re-declaring the same pair is accepted. An empty name only
    /// materializes the column.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::DuplicateColumn`] if `index` already carries a different
    /// name (the error holds `index`), or if `name` is already bound to
    /// another index (the error holds that index).
    /// [`ErrorKind::ColumnIndexTooLarge`] if the registry cannot grow to
    /// `index`. The specification is unchanged on every error.
    pub fn declare_column(&mut self, index: usize, name: &str) -> Result<(), CsvError> {
        self.bind_column(index, name, Location::default())
    }

    /// Materializes an anonymous column at `index`, and every column before
    /// it. Existing names are kept.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::ColumnIndexTooLarge`] if the registry cannot grow to
    /// `index`. Nothing is materialized then.
    pub fn add_column_if_not_exists(&mut self, index: usize) -> Result<(), CsvError> {
        self.columns.materialize(index).map_err(|()| {
            CsvError::new(ErrorKind::ColumnIndexTooLarge { index }, Location::default())
        })
    }

    pub(crate) fn bind_column(
        &mut self,
        index: usize,
        name: &str,
        location: Location,
    ) -> Result<(), CsvError> {
        self.columns.declare(index, name).map_err(|conflict| {
            let kind = match conflict {
                Conflict::Bound(bound) => ErrorKind::DuplicateColumn {
                    index: bound,
                    name: name.into(),
                },
                Conflict::TooLarge => ErrorKind::ColumnIndexTooLarge { index },
            };
            CsvError::new(kind, location)
        })
    }

    /// The index `name` is bound to.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.lookup.get(name).copied()
    }

    /// The name of column `index`, or `""` when it has none.
    #[must_use]
    pub fn column_name(&self, index: usize) -> &str {
        self.columns.name(index).map_or("", |name| &**name)
    }

    /// Number of materialized columns, named or not.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.names.len()
    }
}

/// Name registry: an index-keyed vector of optional names plus the reverse
/// lookup. Both sides stay consistent: every name in `lookup` sits at the
/// index it maps to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ColumnMap {
    names: Vec<Option<Arc<str>>>,
    lookup: BTreeMap<Arc<str>, usize>,
}

/// Why [`ColumnMap::declare`] refused a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conflict {
    /// The name or the index is taken; holds the index already bound.
    Bound(usize),
    /// The registry cannot grow to the index.
    TooLarge,
}

impl ColumnMap {
    /// Grows `names` so that `index` exists. Fails without growing when
    /// `index + 1` entries cannot be allocated.
    fn materialize(&mut self, index: usize) -> Result<(), ()> {
        if self.names.len() > index {
            return Ok(());
        }
        let len = index.checked_add(1).ok_or(())?;
        self.names
            .try_reserve_exact(len - self.names.len())
            .map_err(|_| ())?;
        self.names.resize(len, None);
        Ok(())
    }

    fn name(&self, index: usize) -> Option<&Arc<str>> {
        self.names.get(index).and_then(Option::as_ref)
    }

    /// Binds `name` to `index`. Nothing changes unless it succeeds.
    fn declare(&mut self, index: usize, name: &str) -> Result<(), Conflict> {
        if !name.is_empty() {
            if let Some(&bound) = self.lookup.get(name) {
                return if bound == index {
                    Ok(())
                } else {
                    Err(Conflict::Bound(bound))
                };
            }
            if self.name(index).is_some() {
                return Err(Conflict::Bound(index));
            }
        }
        self.materialize(index).map_err(|()| Conflict::TooLarge)?;
        if name.is_empty() {
            return Ok(());
        }
        let name: Arc<str> = name.into();
        self.lookup.insert(name.clone(), index);
        self.names[index] = Some(name);
        Ok(())
    }
}

/// Scalar conversion conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Locale {
    /// Separates the integral and fractional parts of a number.
    ///
    /// # Default
    ///
    /// `'.'`
    pub decimal_separator: char,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
        }
    }
}

impl Locale {
    /// A locale using `separator` as the decimal separator.
    #[must_use]
    pub const fn with_decimal_separator(separator: char) -> Self {
        Self {
            decimal_separator: separator,
        }
    }
}
