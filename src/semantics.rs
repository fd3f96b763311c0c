//! Value semantics: turning a parse tree into a [`Value`].
//!
//! This pass decodes escapes (merging UTF-16 surrogate pairs), hex and base64
//! data, typed numeric/boolean/date literals, folds dictionary entries with
//! last-write-wins, and applies CF$UID collapsing when enabled.
//!
//! ```rust
//! use serde_textplist::{grammar, semantics, ParseOptions, Uid, Value};
//!
//! let input = r#"{ ref = { "CF$UID" = <*I3>; }; }"#;
//! let tree = grammar::parse(input).unwrap();
//! let value = semantics::transform(&tree, input, &ParseOptions::default()).unwrap();
//! assert_eq!(value.as_dict().unwrap().get("ref").and_then(Value::as_uid), Some(Uid::new(3)));
//! ```

use crate::grammar::{Document, Entry, Escape, Node, QuotedPart, StringNode, TypedLiteral};
use crate::{DictContainer, Error, ParseOptions, PlistMap, Result, Uid, Value};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::DateTime;
use encoding_rs::Encoding;
use std::borrow::Cow;

/// Layout of `<*D...>` literals, shared with the writer.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Builds a [`Value`] from a parse tree.
///
/// `input` must be the text `document` was parsed from; it is used to locate
/// literals that are well-formed but out of range (an `<*I>` that overflows
/// `i64`, a date that does not match [`DATE_FORMAT`]).
///
/// A bare entries document always becomes a [`Value::Dict`] and is never
/// collapsed into a UID.
///
/// # Errors
///
/// Returns [`Error::Grammar`] for literals that cannot be decoded.
pub fn transform(document: &Document<'_>, input: &str, options: &ParseOptions) -> Result<Value> {
    let semantics = Semantics { input, options };
    match document {
        Document::Value(node) => semantics.node(node),
        Document::Entries(entries) => semantics.entries(entries).map(Value::Dict),
    }
}

/// Decodes raw document bytes with `encoding`, dropping a byte-order mark.
///
/// # Errors
///
/// Returns [`Error::Encoding`] when the bytes are malformed for the encoding.
pub fn decode_bytes<'b>(bytes: &'b [u8], encoding: &'static Encoding) -> Result<Cow<'b, str>> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(Error::encoding(
            encoding.name(),
            "input is not valid in the declared encoding",
        ));
    }
    Ok(text)
}

/// Decodes a string node, merging surrogate pairs. Lone surrogates become U+FFFD.
pub fn decode_string(node: &StringNode<'_>) -> String {
    match node {
        StringNode::Unquoted(text) => (*text).to_string(),
        StringNode::Quoted(parts) => {
            let mut units: Vec<u16> = Vec::new();
            for part in parts {
                match part {
                    QuotedPart::Raw(text) => units.extend(text.encode_utf16()),
                    QuotedPart::Escape(escape) => match *escape {
                        Escape::Control(c) | Escape::Literal(c) => {
                            let mut buf = [0u16; 2];
                            units.extend_from_slice(c.encode_utf16(&mut buf));
                        }
                        Escape::Unicode(unit) | Escape::Octal(unit) => units.push(unit),
                        Escape::Hex(byte) => units.push(u16::from(byte)),
                    },
                }
            }
            String::from_utf16_lossy(&units)
        }
    }
}

struct Semantics<'o> {
    input: &'o str,
    options: &'o ParseOptions,
}

impl Semantics<'_> {
    fn node(&self, node: &Node<'_>) -> Result<Value> {
        match node {
            Node::Dict(entries) => {
                let map = self.entries(entries)?;
                if self.options.cfuid_collapsing {
                    if let Some(uid) = map.as_cfuid().and_then(|i| u64::try_from(i).ok()) {
                        return Ok(Value::Uid(Uid::new(uid)));
                    }
                }
                Ok(Value::Dict(map))
            }
            Node::Array(items) => items
                .iter()
                .map(|item| self.node(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Node::String(string) => Ok(Value::String(decode_string(string))),
            Node::HexData(runs) => {
                let digits: String = runs.concat();
                hex::decode(digits)
                    .map(Value::Data)
                    .map_err(|e| Error::custom(format!("invalid hex data: {}", e)))
            }
            Node::Base64Data { body, offset } => {
                let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
                STANDARD
                    .decode(compact)
                    .map(Value::Data)
                    .map_err(|_| Error::grammar(self.input, *offset, "base64 data"))
            }
            Node::Typed { literal, offset } => self.typed(literal, *offset),
        }
    }

    fn entries(&self, entries: &[Entry<'_>]) -> Result<PlistMap> {
        let mut map = PlistMap::with_capacity(entries.len());
        for entry in entries {
            let value = match &entry.value {
                Some(node) => self.node(node)?,
                None => Value::Null,
            };
            map.insert(decode_string(&entry.key), value);
        }
        if self.options.dict_container == DictContainer::Sorted {
            map.sort_keys();
        }
        Ok(map)
    }

    fn typed(&self, literal: &TypedLiteral<'_>, offset: usize) -> Result<Value> {
        let invalid = |expected: &str| Error::grammar(self.input, offset, expected);
        match literal {
            TypedLiteral::Int(text) => text
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| invalid("integer within 64-bit range")),
            TypedLiteral::Uid(text) => text
                .parse::<u64>()
                .map(|uid| Value::Uid(Uid::new(uid)))
                .map_err(|_| invalid("UID within 64-bit range")),
            TypedLiteral::Real(text) => parse_real(text)
                .map(Value::Real)
                .ok_or_else(|| invalid("real number")),
            TypedLiteral::Bool(b) => Ok(Value::Bool(*b)),
            TypedLiteral::Date(text) => DateTime::parse_from_str(text.trim(), DATE_FORMAT)
                .map(Value::Date)
                .map_err(|_| invalid("date formatted as %Y-%m-%d %H:%M:%S %z")),
            TypedLiteral::Null => Ok(Value::Null),
        }
    }
}

fn parse_real(text: &str) -> Option<f64> {
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let value = if magnitude.eq_ignore_ascii_case("nan") {
        f64::NAN
    } else if magnitude.eq_ignore_ascii_case("inf") {
        f64::INFINITY
    } else {
        magnitude.parse::<f64>().ok()?
    };
    Some(if negative { -value } else { value })
}
