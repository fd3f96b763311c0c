//! Dialect writer: serializes a [`Value`] as text.
//!
//! What each variant becomes depends on [`WriteOptions::dialect`]:
//!
//! | value  | OpenStep               | GNUstep            | ExtendedText |
//! |--------|------------------------|--------------------|--------------|
//! | Int    | `42`                   | `<*I42>`           | `<*I42>`     |
//! | Real   | `2.5`                  | `<*R2.5>`          | `<*R2.5>`    |
//! | Bool   | `YES` (fallback)       | `<*BY>`            | `<*BY>`      |
//! | Date   | `"2024-01-15 ..."`     | `<*D2024-01-15 ..>`| same         |
//! | Data   | `<01020304 05>`        | `<[AQID]>` if < 5 bytes, else hex | same |
//! | UID    | `{"CF$UID" = 7;}`      | `{"CF$UID" = <*I7>;}` | `<*U7>`   |
//! | Null   | `""` (fallback)        | `""` (fallback)    | `<*N>`       |
//!
//! Strings are always double-quoted with JSON-compatible escaping.
//!
//! ```rust
//! use serde_textplist::{Value, WriteOptions, Writer};
//!
//! let mut writer = Writer::new(Vec::new(), WriteOptions::default());
//! writer.write(&Value::Array(vec![Value::from(1), Value::from("two")])).unwrap();
//! assert_eq!(writer.into_inner(), b"(\n\t<*I1>,\n\t\"two\",\n)");
//! ```

use crate::grammar::MAX_DEPTH;
use crate::semantics::DATE_FORMAT;
use crate::{Dialect, Error, PlistMap, Result, Value, WriteOptions, CFUID_KEY};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8};
use std::io;

/// Data shorter than this is written as base64 in dialects that support it.
const BASE64_BREAK_EVEN: usize = 5;

/// Streams text plist output into an [`io::Write`] sink.
pub struct Writer<W: io::Write> {
    sink: W,
    options: WriteOptions,
    level: usize,
}

impl<W: io::Write> Writer<W> {
    pub fn new(sink: W, options: WriteOptions) -> Self {
        Writer {
            sink,
            options,
            level: 0,
        }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Writes one complete document.
    ///
    /// In strings-file mode `value` must be a dictionary; its entries are
    /// written without braces, and null entries as bare `"key";`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnrepresentableValue`] when the dialect cannot encode a value
    ///   and fallback is off, or a strings file is asked to hold a non-dictionary
    /// - [`Error::Encoding`] when the output encoding cannot represent the text
    /// - [`Error::Io`] when the sink fails
    pub fn write(&mut self, value: &Value) -> Result<()> {
        log::debug!(
            "writing {} in the {} dialect",
            value.kind(),
            self.options.dialect
        );
        if self.options.strings_file {
            return match value {
                Value::Dict(map) => self.entries(map, true),
                other => Err(Error::unrepresentable(
                    &format!("{} at the top of a strings file", other.kind()),
                    self.options.dialect,
                )),
            };
        }
        self.value(value)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    fn dialect(&self) -> Dialect {
        self.options.dialect
    }

    fn value(&mut self, value: &Value) -> Result<()> {
        let typed = self.dialect().has_typed_literals();
        match value {
            Value::Null => self.null(),
            Value::Bool(b) => {
                if typed {
                    self.put(if *b { "<*BY>" } else { "<*BN>" })
                } else if self.options.fallback {
                    log::trace!("writing bool as YES/NO in the {} dialect", self.dialect());
                    self.put(if *b { "YES" } else { "NO" })
                } else {
                    Err(Error::unrepresentable("bool", self.dialect()))
                }
            }
            Value::Int(i) => {
                if typed {
                    self.put(&format!("<*I{}>", i))
                } else {
                    self.put(&i.to_string())
                }
            }
            Value::Real(r) => {
                if typed {
                    self.put(&format!("<*R{:?}>", r))
                } else {
                    self.put(&format!("{:?}", r))
                }
            }
            Value::String(s) => {
                let quoted = quote(s, self.options.escape_all_non_ascii);
                self.put(&quoted)
            }
            Value::Date(dt) => {
                let text = if self.options.use_utc_for_dates {
                    dt.with_timezone(&Utc).format(DATE_FORMAT).to_string()
                } else {
                    dt.format(DATE_FORMAT).to_string()
                };
                if typed {
                    self.put(&format!("<*D{}>", text))
                } else {
                    self.put(&quote(&text, false))
                }
            }
            Value::Data(bytes) => {
                if typed && bytes.len() < BASE64_BREAK_EVEN {
                    self.put(&format!("<[{}]>", STANDARD.encode(bytes)))
                } else {
                    self.put(&format!("<{}>", hex_groups(bytes)))
                }
            }
            Value::Uid(uid) => {
                if self.dialect().has_uid_and_null() {
                    return self.put(&format!("<*U{}>", uid));
                }
                let int = i64::try_from(uid.get())
                    .map_err(|_| Error::unrepresentable("UID above i64::MAX", self.dialect()))?;
                let mut map = PlistMap::with_capacity(1);
                map.insert(CFUID_KEY.to_string(), Value::Int(int));
                self.dict(&map)
            }
            Value::Array(items) => {
                self.descend()?;
                self.put("(\n")?;
                for item in items {
                    self.put_indent()?;
                    self.value(item)?;
                    self.put(",\n")?;
                }
                self.level -= 1;
                self.put_indent()?;
                self.put(")")
            }
            Value::Dict(map) => self.dict(map),
        }
    }

    fn null(&mut self) -> Result<()> {
        if self.dialect().has_uid_and_null() {
            self.put("<*N>")
        } else if self.options.fallback {
            log::trace!("writing null as \"\" in the {} dialect", self.dialect());
            self.put("\"\"")
        } else {
            Err(Error::unrepresentable("null", self.dialect()))
        }
    }

    fn dict(&mut self, map: &PlistMap) -> Result<()> {
        self.descend()?;
        self.put("{\n")?;
        self.entries(map, false)?;
        self.level -= 1;
        self.put_indent()?;
        self.put("}")
    }

    fn entries(&mut self, map: &PlistMap, top_level: bool) -> Result<()> {
        let mut entries: Vec<(&String, &Value)> = map.iter().collect();
        if self.options.sort_keys {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }
        let implicit_null = top_level || self.dialect().has_uid_and_null();
        for (key, value) in entries {
            self.put_indent()?;
            let quoted = quote(key, self.options.escape_all_non_ascii);
            self.put(&quoted)?;
            if !(implicit_null && value.is_null()) {
                self.put(" = ")?;
                self.value(value)?;
            }
            self.put(";\n")?;
        }
        Ok(())
    }

    /// Enters one container level, failing past [`MAX_DEPTH`].
    fn descend(&mut self) -> Result<()> {
        if self.level >= MAX_DEPTH {
            return Err(Error::unrepresentable(
                &format!("nesting deeper than {} levels", MAX_DEPTH),
                self.dialect(),
            ));
        }
        self.level += 1;
        Ok(())
    }

    fn put_indent(&mut self) -> Result<()> {
        if self.level == 0 {
            return Ok(());
        }
        let pad = self.options.indent.repeat(self.level);
        self.put(&pad)
    }

    fn put(&mut self, text: &str) -> Result<()> {
        let encoding = self.options.encoding;
        if encoding == UTF_8 {
            self.sink.write_all(text.as_bytes())?;
        } else if encoding == UTF_16LE {
            let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
            self.sink.write_all(&bytes)?;
        } else if encoding == UTF_16BE {
            let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
            self.sink.write_all(&bytes)?;
        } else {
            let (bytes, _, had_errors) = encoding.encode(text);
            if had_errors {
                return Err(Error::encoding(
                    encoding.name(),
                    &format!("cannot encode {:?}", text),
                ));
            }
            self.sink.write_all(&bytes)?;
        }
        Ok(())
    }
}

/// Quotes `text` the way JSON does: `"`, `\` and control characters are
/// escaped, and with `ascii_only` every non-ASCII code point becomes `\uXXXX`
/// (astral characters as a surrogate pair).
///
/// # Examples
///
/// ```rust
/// use serde_textplist::writer::quote;
///
/// assert_eq!(quote("say \"hi\"\n", false), r#""say \"hi\"\n""#);
/// assert_eq!(quote("caf\u{e9}", true), r#""caf\u00e9""#);
/// ```
pub fn quote(text: &str, ascii_only: bool) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => push_unicode_escape(&mut out, c as u16),
            c if ascii_only && !c.is_ascii() => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    push_unicode_escape(&mut out, *unit);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn push_unicode_escape(out: &mut String, unit: u16) {
    out.push_str(&format!("\\u{:04x}", unit));
}

/// Lowercase hex in space-separated groups of four bytes.
fn hex_groups(bytes: &[u8]) -> String {
    bytes
        .chunks(4)
        .map(hex::encode)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Uid;
    use chrono::{FixedOffset, TimeZone};

    fn write(value: &Value, options: WriteOptions) -> Result<String> {
        let mut writer = Writer::new(Vec::new(), options);
        writer.write(value)?;
        Ok(String::from_utf8(writer.into_inner()).unwrap())
    }

    fn in_dialect(value: &Value, dialect: Dialect) -> String {
        write(value, WriteOptions::new().with_dialect(dialect)).unwrap()
    }

    #[test]
    fn test_scalars_per_dialect() {
        let cases = [
            (Value::Int(-3), ["-3", "<*I-3>", "<*I-3>"]),
            (Value::Real(2.5), ["2.5", "<*R2.5>", "<*R2.5>"]),
            (Value::Real(1.0), ["1.0", "<*R1.0>", "<*R1.0>"]),
            (Value::Bool(true), ["YES", "<*BY>", "<*BY>"]),
            (Value::Bool(false), ["NO", "<*BN>", "<*BN>"]),
            (Value::Null, ["\"\"", "\"\"", "<*N>"]),
            (Value::Uid(Uid::new(7)), [
                "{\n\t\"CF$UID\" = 7;\n}",
                "{\n\t\"CF$UID\" = <*I7>;\n}",
                "<*U7>",
            ]),
        ];
        let dialects = [Dialect::OpenStep, Dialect::GNUstep, Dialect::ExtendedText];
        for (value, expected) in cases.iter() {
            for (dialect, text) in dialects.iter().zip(expected.iter()) {
                assert_eq!(&in_dialect(value, *dialect), text, "{:?} in {}", value, dialect);
            }
        }
    }

    #[test]
    fn test_data_forms() {
        let short = Value::Data(vec![1, 2, 3, 4]);
        let long = Value::Data(vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(in_dialect(&short, Dialect::GNUstep), "<[AQIDBA==]>");
        assert_eq!(in_dialect(&short, Dialect::OpenStep), "<01020304>");
        assert_eq!(in_dialect(&long, Dialect::GNUstep), "<01020304 0506>");
        assert_eq!(in_dialect(&Value::Data(vec![]), Dialect::GNUstep), "<[]>");
        assert_eq!(in_dialect(&Value::Data(vec![]), Dialect::OpenStep), "<>");
    }

    #[test]
    fn test_dates() {
        let date = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
            .unwrap();
        let value = Value::Date(date);
        assert_eq!(
            in_dialect(&value, Dialect::GNUstep),
            "<*D2024-01-15 09:30:00 +0000>"
        );
        assert_eq!(
            in_dialect(&value, Dialect::OpenStep),
            "\"2024-01-15 09:30:00 +0000\""
        );
        let local = write(&value, WriteOptions::new().with_utc_dates(false)).unwrap();
        assert_eq!(local, "<*D2024-01-15 10:30:00 +0100>");
    }

    #[test]
    fn test_fallback_disabled() {
        let options = WriteOptions::new()
            .with_dialect(Dialect::OpenStep)
            .with_fallback(false);
        assert!(matches!(
            write(&Value::Null, options.clone()),
            Err(Error::UnrepresentableValue { .. })
        ));
        assert!(matches!(
            write(&Value::Bool(true), options.clone()),
            Err(Error::UnrepresentableValue { .. })
        ));
        assert_eq!(write(&Value::Int(1), options).unwrap(), "1");
    }

    #[test]
    fn test_large_uid_without_literal() {
        let value = Value::Uid(Uid::new(u64::MAX));
        let err = write(&value, WriteOptions::new()).unwrap_err();
        assert!(matches!(err, Error::UnrepresentableValue { .. }));
        assert_eq!(
            in_dialect(&value, Dialect::ExtendedText),
            format!("<*U{}>", u64::MAX)
        );
    }

    #[test]
    fn test_nested_layout() {
        let mut inner = PlistMap::new();
        inner.insert("b".to_string(), Value::from("x"));
        let mut outer = PlistMap::new();
        outer.insert("z".to_string(), Value::Array(vec![Value::from(1)]));
        outer.insert("a".to_string(), Value::Dict(inner));
        let text = write(&Value::Dict(outer), WriteOptions::new().with_indent("  ")).unwrap();
        assert_eq!(
            text,
            "{\n  \"a\" = {\n    \"b\" = \"x\";\n  };\n  \"z\" = (\n    <*I1>,\n  );\n}"
        );
    }

    #[test]
    fn test_unsorted_keys_keep_insertion_order() {
        let map: PlistMap = vec![
            ("z".to_string(), Value::from("1")),
            ("a".to_string(), Value::from("2")),
        ]
        .into_iter()
        .collect();
        let text = write(&Value::Dict(map), WriteOptions::new().with_sort_keys(false)).unwrap();
        assert_eq!(text, "{\n\t\"z\" = \"1\";\n\t\"a\" = \"2\";\n}");
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(in_dialect(&Value::Array(vec![]), Dialect::GNUstep), "(\n)");
        assert_eq!(in_dialect(&Value::Dict(PlistMap::new()), Dialect::GNUstep), "{\n}");
    }

    #[test]
    fn test_extended_null_entries_are_bare() {
        let map: PlistMap = vec![("k".to_string(), Value::Null)].into_iter().collect();
        assert_eq!(
            in_dialect(&Value::Dict(map.clone()), Dialect::ExtendedText),
            "{\n\t\"k\";\n}"
        );
        assert_eq!(
            in_dialect(&Value::Dict(map), Dialect::GNUstep),
            "{\n\t\"k\" = \"\";\n}"
        );
    }

    #[test]
    fn test_strings_file() {
        let map: PlistMap = vec![
            ("b".to_string(), Value::Null),
            ("a".to_string(), Value::from("1")),
        ]
        .into_iter()
        .collect();
        let text = write(&Value::Dict(map), WriteOptions::strings_file()).unwrap();
        assert_eq!(text, "\"a\" = \"1\";\n\"b\";\n");

        let err = write(&Value::from("x"), WriteOptions::strings_file()).unwrap_err();
        assert!(matches!(err, Error::UnrepresentableValue { .. }));
    }

    fn nested_arrays(depth: usize) -> Value {
        (0..depth).fold(Value::from("leaf"), |inner, _| Value::Array(vec![inner]))
    }

    #[test]
    fn test_nesting_limit() {
        let text = write(&nested_arrays(MAX_DEPTH), WriteOptions::new()).unwrap();
        assert_eq!(crate::parse_str(&text, &Default::default()).unwrap(), nested_arrays(MAX_DEPTH));

        let err = write(&nested_arrays(MAX_DEPTH + 1), WriteOptions::new()).unwrap_err();
        assert!(matches!(err, Error::UnrepresentableValue { .. }));

        let mut dict = PlistMap::new();
        dict.insert("k".to_string(), nested_arrays(MAX_DEPTH));
        assert!(write(&Value::Dict(dict), WriteOptions::new()).is_err());
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("a\u{1}b", false), "\"a\\u0001b\"");
        assert_eq!(quote("tab\there", false), "\"tab\\there\"");
        assert_eq!(quote("\u{1F600}", false), "\"\u{1F600}\"");
        assert_eq!(quote("\u{1F600}", true), "\"\\ud83d\\ude00\"");
    }

    #[test]
    fn test_output_encoding() {
        let options = WriteOptions::new().with_encoding(encoding_rs::WINDOWS_1252);
        let mut writer = Writer::new(Vec::new(), options.clone());
        writer.write(&Value::from("caf\u{e9}")).unwrap();
        assert_eq!(writer.into_inner(), b"\"caf\xE9\"");

        let mut writer = Writer::new(Vec::new(), options);
        let err = writer.write(&Value::from("\u{4e2d}")).unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));

        let options = WriteOptions::new().with_encoding(encoding_rs::UTF_16LE);
        let mut writer = Writer::new(Vec::new(), options);
        writer.write(&Value::from("a")).unwrap();
        assert_eq!(writer.into_inner(), b"\"\0a\0\"\0");
    }
}
