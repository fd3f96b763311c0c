//! # serde_textplist
//!
//! A Serde-compatible codec for textual property lists in the OpenStep and
//! GNUstep styles.
//!
//! ## What is a text property list?
//!
//! The human-editable plist syntax from NeXTSTEP and its descendants: nested
//! dictionaries `{ key = value; }`, arrays `( a, b )`, strings, hex data
//! `<0fa1>`, and (in GNUstep) typed literals like `<*I42>` or
//! `<*D2024-01-15 10:30:00 +0000>`. It is still found in configuration files,
//! localization `.strings` files and project files.
//!
//! ## Key Features
//!
//! - **Full grammar**: comments, unquoted words, every escape form, surrogate
//!   pairs, hex and base64 data, typed literals, strings files
//! - **Dialect-aware writer**: output for [`Dialect::OpenStep`],
//!   [`Dialect::GNUstep`] or [`Dialect::ExtendedText`], with configurable fallbacks
//! - **Serde Compatible**: `#[derive(Serialize, Deserialize)]` types round-trip
//!   through [`to_string`] and [`from_str`]
//! - **Detailed errors**: grammar errors report line, column and what was expected
//! - **Format registry**: [`FormatRegistry`] sniffs and dispatches between codecs
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_textplist = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Basic Serialization and Deserialization
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_textplist::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u32,
//!     name: String,
//!     active: bool,
//! }
//!
//! let user = User { id: 123, name: "Alice".to_string(), active: true };
//!
//! let text = to_string(&user).unwrap();
//! assert_eq!(text, "{\n\t\"active\" = <*BY>;\n\t\"id\" = <*I123>;\n\t\"name\" = \"Alice\";\n}");
//!
//! let user_back: User = from_str(&text).unwrap();
//! assert_eq!(user, user_back);
//! ```
//!
//! ### Working with Values
//!
//! ```rust
//! use serde_textplist::{parse_str, write_to_string, Dialect, ParseOptions, Uid, Value, WriteOptions};
//!
//! let value = parse_str(
//!     r#"{ root = { "CF$UID" = <*I1>; }; data = <[AQI=]>; }"#,
//!     &ParseOptions::default(),
//! ).unwrap();
//!
//! let dict = value.as_dict().unwrap();
//! assert_eq!(dict.get("root"), Some(&Value::Uid(Uid::new(1))));
//! assert_eq!(dict.get("data"), Some(&Value::Data(vec![1, 2])));
//!
//! let options = WriteOptions::new().with_dialect(Dialect::ExtendedText);
//! let text = write_to_string(&value, &options).unwrap();
//! assert_eq!(text, "{\n\t\"data\" = <[AQI=]>;\n\t\"root\" = <*U1>;\n}");
//! ```
//!
//! ## Layers
//!
//! Reading goes bytes → [`grammar`] (parse tree) → [`semantics`] ([`Value`]);
//! writing goes [`Value`] → [`writer`] → bytes. The serde functions add
//! [`ser::ValueSerializer`] or [`de::ValueDeserializer`] on top. See [`format`]
//! for the syntax itself.
//!
//! Every call is self-contained: no global state, no caches, no threads.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - Serializing a struct and reading it back
//! - **`dynamic_values.rs`** - Building and inspecting [`Value`]s
//! - **`dialects.rs`** - The same data in each dialect
//! - **`strings_file.rs`** - Reading and writing localization tables
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod format;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod options;
pub mod registry;
pub mod semantics;
pub mod ser;
pub mod sniff;
pub mod value;
pub mod writer;

pub use de::ValueDeserializer;
pub use error::{Error, Result};
pub use map::PlistMap;
pub use options::{Dialect, DictContainer, ParseOptions, WriteOptions};
pub use registry::{FormatHandler, FormatRegistry, PlistReader, PlistWriter, TEXT_FORMAT};
pub use ser::ValueSerializer;
pub use sniff::looks_like_text_plist;
pub use value::{Uid, Value};
pub use writer::Writer;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io;

/// Key of the one-entry dictionary that stands for a UID.
pub const CFUID_KEY: &str = "CF$UID";

/// Parse text into a [`Value`].
///
/// A leading byte-order mark is ignored. In strings-file mode the text must
/// be a run of entries; otherwise either a single value or a run of entries
/// is accepted.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::{parse_str, ParseOptions, Value};
///
/// let value = parse_str("( 1, <*I2>, \"three\" )", &ParseOptions::default()).unwrap();
/// assert_eq!(
///     value,
///     Value::Array(vec![Value::from("1"), Value::Int(2), Value::from("three")])
/// );
/// ```
///
/// # Errors
///
/// Returns [`Error::Grammar`] if the text is malformed; no partial value is produced.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str(text: &str, options: &ParseOptions) -> Result<Value> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    log::debug!(
        "parsing {} bytes of text plist (strings file: {})",
        text.len(),
        options.strings_file
    );
    let tree = if options.strings_file {
        grammar::parse_entries(text)?
    } else {
        grammar::parse(text)?
    };
    semantics::transform(&tree, text, options)
}

/// Decode bytes with [`ParseOptions::encoding`] and parse them into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_textplist::{parse_slice, ParseOptions, Value};
///
/// let options = ParseOptions::new().with_encoding_label("latin1").unwrap();
/// let value = parse_slice(b"\"caf\xE9\"", &options).unwrap();
/// assert_eq!(value, Value::from("caf\u{e9}"));
/// ```
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes cannot be decoded, or
/// [`Error::Grammar`] if the text is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(bytes: &[u8], options: &ParseOptions) -> Result<Value> {
    let text = semantics::decode_bytes(bytes, options.encoding)?;
    parse_str(&text, options)
}

/// Write a [`Value`] as text. The encoding option does not apply.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::{write_to_string, Dialect, Value, WriteOptions};
///
/// let options = WriteOptions::new().with_dialect(Dialect::OpenStep);
/// let text = write_to_string(&Value::Data(vec![0xca, 0xfe]), &options).unwrap();
/// assert_eq!(text, "<cafe>");
/// ```
///
/// # Errors
///
/// Returns [`Error::UnrepresentableValue`] if the dialect cannot encode a
/// value and fallback is disabled.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_to_string(value: &Value, options: &WriteOptions) -> Result<String> {
    let options = options.clone().with_encoding(encoding_rs::UTF_8);
    let bytes = write_to_vec(value, &options)?;
    String::from_utf8(bytes).map_err(|e| Error::encoding("UTF-8", &e.to_string()))
}

/// Write a [`Value`] as bytes in [`WriteOptions::encoding`].
///
/// # Errors
///
/// Returns [`Error::UnrepresentableValue`] if the dialect cannot encode a
/// value, or [`Error::Encoding`] if the text does not fit the encoding.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn write_to_vec(value: &Value, options: &WriteOptions) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::with_capacity(128), options.clone());
    writer.write(value)?;
    Ok(writer.into_inner())
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use serde_textplist::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_dict());
/// ```
///
/// # Errors
///
/// Returns [`Error::KeyType`] if a map has non-string keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer::new())
}

/// Convert any `T: Serialize` to a [`Value`], honoring `skip_non_string_keys`.
///
/// # Errors
///
/// Returns [`Error::KeyType`] if a map has non-string keys and skipping is off.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value_with_options<T>(value: &T, options: &WriteOptions) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer::new().with_skip_non_string_keys(options.skip_non_string_keys))
}

/// Convert a [`Value`] into any `T: Deserialize`.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::{from_value, plist};
///
/// let pair: (String, u8) = from_value(plist!(["x", 7])).unwrap();
/// assert_eq!(pair, ("x".to_string(), 7));
/// ```
///
/// # Errors
///
/// Returns an error if the value does not have the shape `T` expects.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Serialize any `T: Serialize` to a text plist in the default dialect.
///
/// # Errors
///
/// Returns an error if the value cannot be converted or written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &WriteOptions::default())
}

/// Serialize any `T: Serialize` to a text plist with custom options.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::{to_string_with_options, Dialect, WriteOptions};
///
/// let options = WriteOptions::new().with_dialect(Dialect::OpenStep);
/// assert_eq!(to_string_with_options(&vec![1, 2], &options).unwrap(), "(\n\t1,\n\t2,\n)");
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be converted or written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &WriteOptions) -> Result<String>
where
    T: ?Sized + Serialize,
{
    write_to_string(&to_value_with_options(value, options)?, options)
}

/// Serialize any `T: Serialize` to bytes in the default encoding (UTF-8).
///
/// # Errors
///
/// Returns an error if the value cannot be converted or written.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec<T>(value: &T) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    to_vec_with_options(value, &WriteOptions::default())
}

/// Serialize any `T: Serialize` to bytes in [`WriteOptions::encoding`].
///
/// # Errors
///
/// Returns an error if the value cannot be converted, written or encoded.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec_with_options<T>(value: &T, options: &WriteOptions) -> Result<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    write_to_vec(&to_value_with_options(value, options)?, options)
}

/// Serialize any `T: Serialize` into an [`io::Write`] sink.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &("a", "b")).unwrap();
/// assert_eq!(buffer, b"(\n\t\"a\",\n\t\"b\",\n)");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the sink fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    to_writer_with_options(writer, value, &WriteOptions::default())
}

/// Serialize any `T: Serialize` into an [`io::Write`] sink with custom options.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the sink fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(writer: W, value: &T, options: &WriteOptions) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let value = to_value_with_options(value, options)?;
    let mut writer = Writer::new(writer, options.clone());
    writer.write(&value)?;
    writer.flush()
}

/// Deserialize an instance of type `T` from text plist.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{ x = <*I1>; y = 2; }").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the text is malformed or does not fit `T`.
/// Grammar errors include line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, &ParseOptions::default())
}

/// Deserialize an instance of type `T` from text plist with custom options.
///
/// # Errors
///
/// Returns an error if the text is malformed or does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &ParseOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse_str(s, options)?)
}

/// Deserialize an instance of type `T` from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, the text is malformed,
/// or it does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    from_slice_with_options(v, &ParseOptions::default())
}

/// Deserialize an instance of type `T` from bytes in [`ParseOptions::encoding`].
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded, the text is malformed,
/// or it does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with_options<T>(v: &[u8], options: &ParseOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse_slice(v, options)?)
}

/// Deserialize an instance of type `T` from an I/O stream of UTF-8 text plist.
///
/// # Examples
///
/// ```rust
/// use serde_textplist::from_reader;
/// use std::collections::BTreeMap;
/// use std::io::Cursor;
///
/// let table: BTreeMap<String, String> = from_reader(Cursor::new("\"a\" = \"1\";")).unwrap();
/// assert_eq!(table.get("a").map(String::as_str), Some("1"));
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is malformed, or it does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: for<'de> Deserialize<'de>,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        score: f64,
        tags: Vec<String>,
        manager: Option<String>,
    }

    fn sample_user() -> User {
        User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            score: 9.5,
            tags: vec!["admin".to_string(), "user".to_string()],
            manager: None,
        }
    }

    #[test]
    fn test_serialize_deserialize_point() {
        let point = Point { x: 1, y: -2 };
        let text = to_string(&point).unwrap();
        let point_back: Point = from_str(&text).unwrap();
        assert_eq!(point, point_back);
    }

    #[test]
    fn test_user_round_trip_in_every_dialect() {
        for dialect in [Dialect::OpenStep, Dialect::GNUstep, Dialect::ExtendedText] {
            let options = WriteOptions::new().with_dialect(dialect);
            let text = to_string_with_options(&sample_user(), &options).unwrap();
            let user_back: User = from_str(&text).unwrap();
            assert_eq!(user_back, sample_user(), "dialect {}", dialect);
        }
    }

    #[test]
    fn test_to_value() {
        let value = to_value(&Point { x: 1, y: 2 }).unwrap();
        let dict = value.as_dict().unwrap();
        assert_eq!(dict.get("x"), Some(&Value::Int(1)));
        assert_eq!(dict.get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_skip_non_string_keys() {
        let mut map = BTreeMap::new();
        map.insert(1u8, "x");
        assert!(matches!(to_string(&map), Err(Error::KeyType(_))));

        let options = WriteOptions::new().with_skip_non_string_keys(true);
        assert_eq!(to_string_with_options(&map, &options).unwrap(), "{\n}");
    }

    #[test]
    fn test_bom_is_ignored() {
        let value = parse_str("\u{feff}( a )", &ParseOptions::default()).unwrap();
        assert_eq!(value, Value::Array(vec![Value::from("a")]));
        let value = parse_slice(b"\xEF\xBB\xBF( a )", &ParseOptions::default()).unwrap();
        assert_eq!(value, Value::Array(vec![Value::from("a")]));
    }

    #[test]
    fn test_strings_file_mode_requires_entries() {
        let options = ParseOptions::strings_file();
        assert!(parse_str("( a )", &options).is_err());
        let value = parse_str("a = b;", &options).unwrap();
        assert!(value.is_dict());
    }

    #[test]
    fn test_to_vec_with_encoding() {
        let options = WriteOptions::new().with_encoding(encoding_rs::WINDOWS_1252);
        let bytes = to_vec_with_options(&"\u{e9}", &options).unwrap();
        assert_eq!(bytes, b"\"\xE9\"");
    }

    #[test]
    fn test_write_to_string_ignores_encoding() {
        let options = WriteOptions::new().with_encoding(encoding_rs::UTF_16LE);
        assert_eq!(write_to_string(&Value::from("x"), &options).unwrap(), "\"x\"");
    }
}
