//! Configuration options for reading and writing text plists.
//!
//! This module provides types to customize both directions:
//!
//! - [`ParseOptions`]: CF$UID collapsing, dictionary ordering, input encoding, strings-file mode
//! - [`WriteOptions`]: Target [`Dialect`], indentation, key sorting, escaping, fallbacks
//! - [`Dialect`]: The three compatibility profiles, ordered by richness
//!
//! ## Examples
//!
//! ```rust
//! use serde_textplist::{write_to_string, Dialect, Value, WriteOptions};
//!
//! let options = WriteOptions::new().with_dialect(Dialect::OpenStep);
//! let text = write_to_string(&Value::from(42), &options).unwrap();
//! assert_eq!(text, "42");
//!
//! let options = WriteOptions::new().with_dialect(Dialect::GNUstep);
//! let text = write_to_string(&Value::from(42), &options).unwrap();
//! assert_eq!(text, "<*I42>");
//! ```

use encoding_rs::{Encoding, UTF_8};
use std::fmt;
use std::str::FromStr;

/// Compatibility profile for written text.
///
/// Dialects are totally ordered from most conservative to most permissive,
/// `OpenStep < GNUstep < ExtendedText`; comparisons read as "at least as rich as".
///
/// # Examples
///
/// ```rust
/// use serde_textplist::Dialect;
///
/// assert!(Dialect::OpenStep < Dialect::GNUstep);
/// assert!(Dialect::ExtendedText >= Dialect::GNUstep);
/// assert_eq!(Dialect::default(), Dialect::GNUstep);
/// assert_eq!("openstep".parse::<Dialect>().unwrap(), Dialect::OpenStep);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Dialect {
    /// Plain literals only: no typed tags, hex data, CF$UID dictionaries.
    OpenStep,
    /// Adds `<*I>`, `<*R>`, `<*B>`, `<*D>` tags and short base64 data.
    #[default]
    GNUstep,
    /// Adds `<*U>` references and a first-class null.
    ExtendedText,
}

impl Dialect {
    /// Returns the canonical name of this dialect.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dialect::OpenStep => "OpenStep",
            Dialect::GNUstep => "GNUstep",
            Dialect::ExtendedText => "ExtendedText",
        }
    }

    /// Whether this dialect has typed `<*X..>` literals for scalars.
    #[must_use]
    pub fn has_typed_literals(&self) -> bool {
        *self >= Dialect::GNUstep
    }

    /// Whether this dialect has first-class `<*U..>` and null literals.
    #[must_use]
    pub fn has_uid_and_null(&self) -> bool {
        *self >= Dialect::ExtendedText
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openstep" => Ok(Dialect::OpenStep),
            "gnustep" => Ok(Dialect::GNUstep),
            "extendedtext" | "extended" => Ok(Dialect::ExtendedText),
            _ => Err(crate::Error::custom(format!("unknown dialect '{}'", s))),
        }
    }
}

/// Ordering applied to dictionary entries after they are folded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DictContainer {
    /// Keep entries in document order (later duplicates overwrite in place).
    #[default]
    InsertionOrder,
    /// Re-sort entries by key.
    Sorted,
}

/// Options for turning text into a [`Value`](crate::Value).
///
/// # Examples
///
/// ```rust
/// use serde_textplist::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert!(options.cfuid_collapsing);
/// assert!(!options.strings_file);
///
/// let options = ParseOptions::strings_file().with_cfuid_collapsing(false);
/// assert!(options.strings_file);
/// ```
#[derive(Clone, Debug)]
pub struct ParseOptions {
    pub dict_container: DictContainer,
    pub cfuid_collapsing: bool,
    /// Encoding used by byte-oriented entry points. A UTF-8 BOM is always stripped.
    pub encoding: &'static Encoding,
    pub strings_file: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            dict_container: DictContainer::default(),
            cfuid_collapsing: true,
            encoding: UTF_8,
            strings_file: false,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for reading `.strings` files: a flat dictionary without braces.
    #[must_use]
    pub fn strings_file() -> Self {
        ParseOptions {
            strings_file: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_dict_container(mut self, container: DictContainer) -> Self {
        self.dict_container = container;
        self
    }

    #[must_use]
    pub fn with_cfuid_collapsing(mut self, enabled: bool) -> Self {
        self.cfuid_collapsing = enabled;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Looks the encoding up by its WHATWG label (`"utf-8"`, `"latin1"`, `"shift_jis"`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`](crate::Error::Encoding) for unknown labels.
    pub fn with_encoding_label(self, label: &str) -> crate::Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| crate::Error::encoding(label, "unknown encoding label"))?;
        Ok(self.with_encoding(encoding))
    }

    #[must_use]
    pub fn with_strings_file(mut self, enabled: bool) -> Self {
        self.strings_file = enabled;
        self
    }
}

/// Options for turning a [`Value`](crate::Value) into text.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::{Dialect, WriteOptions};
///
/// let options = WriteOptions::new();
/// assert_eq!(options.dialect, Dialect::GNUstep);
/// assert_eq!(options.indent, "\t");
/// assert!(options.sort_keys);
/// assert!(options.fallback);
///
/// let options = WriteOptions::new()
///     .with_dialect(Dialect::ExtendedText)
///     .with_indent("    ")
///     .with_sort_keys(false);
/// ```
#[derive(Clone, Debug)]
pub struct WriteOptions {
    pub dialect: Dialect,
    /// Written once per nesting level.
    pub indent: String,
    pub sort_keys: bool,
    pub skip_non_string_keys: bool,
    pub escape_all_non_ascii: bool,
    /// Substitute a best-effort literal when the dialect lacks one.
    pub fallback: bool,
    pub use_utc_for_dates: bool,
    pub strings_file: bool,
    /// Encoding used by byte-oriented entry points.
    pub encoding: &'static Encoding,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            dialect: Dialect::default(),
            indent: "\t".to_string(),
            sort_keys: true,
            skip_non_string_keys: false,
            escape_all_non_ascii: false,
            fallback: true,
            use_utc_for_dates: true,
            strings_file: false,
            encoding: UTF_8,
        }
    }
}

impl WriteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for writing `.strings` files: top-level entries without braces.
    #[must_use]
    pub fn strings_file() -> Self {
        WriteOptions {
            strings_file: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    #[must_use]
    pub fn with_sort_keys(mut self, sort: bool) -> Self {
        self.sort_keys = sort;
        self
    }

    #[must_use]
    pub fn with_skip_non_string_keys(mut self, skip: bool) -> Self {
        self.skip_non_string_keys = skip;
        self
    }

    #[must_use]
    pub fn with_escape_all_non_ascii(mut self, escape: bool) -> Self {
        self.escape_all_non_ascii = escape;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn with_utc_dates(mut self, utc: bool) -> Self {
        self.use_utc_for_dates = utc;
        self
    }

    #[must_use]
    pub fn with_strings_file(mut self, enabled: bool) -> Self {
        self.strings_file = enabled;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_ordering() {
        let mut dialects = vec![Dialect::ExtendedText, Dialect::OpenStep, Dialect::GNUstep];
        dialects.sort();
        assert_eq!(
            dialects,
            vec![Dialect::OpenStep, Dialect::GNUstep, Dialect::ExtendedText]
        );
        assert!(!Dialect::OpenStep.has_typed_literals());
        assert!(Dialect::GNUstep.has_typed_literals());
        assert!(!Dialect::GNUstep.has_uid_and_null());
        assert!(Dialect::ExtendedText.has_uid_and_null());
    }

    #[test]
    fn test_dialect_parse_roundtrip() {
        for dialect in [Dialect::OpenStep, Dialect::GNUstep, Dialect::ExtendedText] {
            assert_eq!(dialect.to_string().parse::<Dialect>().unwrap(), dialect);
        }
        assert!("xml".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_encoding_label() {
        let options = ParseOptions::new().with_encoding_label("latin1").unwrap();
        assert_eq!(options.encoding.name(), "windows-1252");
        assert!(ParseOptions::new().with_encoding_label("klingon").is_err());
    }
}
