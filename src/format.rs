//! The text property list format
//!
//! This module documents the textual ("ASCII", OpenStep-style) property list
//! syntax as read and written by this library. It contains no code.
//!
//! # Overview
//!
//! A document is either a single value, or a flat run of `key = value;`
//! entries without enclosing braces (a "strings file"). Values nest freely.
//!
//! ```text
//! /* Window layout */
//! {
//!     title = "Main Window";
//!     frame = (0, 0, 640, 480);
//!     icon = <89504e47 0d0a1a0a>;
//!     visible = <*BY>;
//!     opacity = <*R0.95>;
//!     created = <*D2024-01-15 10:30:00 +0000>;
//! }
//! ```
//!
//! # Lexical rules
//!
//! - Whitespace (any Unicode whitespace), `/* block */` and `// line` comments
//!   may appear between any two tokens, between the byte pairs of hex data,
//!   and around the tag, quotes and body of a typed literal (`<* I "5" >`).
//!   They are not skipped inside quoted strings or within a literal's digits.
//! - An **unquoted string** is a non-empty run of
//!   `A-Z a-z 0-9 - # ! $ % & * + . / : ? @ ^ _ | ~`. Anything else must be
//!   quoted.
//!
//! # Values
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `{ k = v; k2; }` | dictionary; `k2;` has a null value |
//! | `( a, b, )` | array; a trailing comma is allowed, `(,)` is empty |
//! | `word` / `"text"` | string |
//! | `<0fa1 b2>` | data, as pairs of hex digits |
//! | `<[AQID]>` | data, as base64 |
//! | `<*I-42>` | integer |
//! | `<*U7>` | UID reference |
//! | `<*R2.5>`, `<*R-inf>`, `<*Rnan>` | real |
//! | `<*BY>`, `<*BN>` | boolean |
//! | `<*D2024-01-15 10:30:00 +0000>` | date, `%Y-%m-%d %H:%M:%S %z` |
//! | `<*N>` | null |
//!
//! The body of `<*I>`, `<*U>`, `<*R>`, `<*B>` and `<*D>` literals may be
//! wrapped in double quotes: `<*I"5">` reads the same as `<*I5>`.
//!
//! Real literals are an optional `-`, then `nan`, `inf` (any case), digits with
//! an optional fraction, or a fraction alone (`.5`); an exponent
//! `e`/`E` with optional sign may follow.
//!
//! # Quoted strings
//!
//! Inside double quotes, a backslash starts an escape:
//!
//! | Escape | Result |
//! |--------|--------|
//! | `\a \b \t \r \n \v \f` | the control character |
//! | `\uXXXX`, `\UXXXX` | UTF-16 code unit (exactly four hex digits) |
//! | `\xXX` | code point (exactly two hex digits) |
//! | `\0` to `\777` | code point from one to three octal digits |
//! | `\` + anything else | that character |
//!
//! Consecutive `\u` escapes forming a surrogate pair are merged; a lone
//! surrogate becomes U+FFFD.
//!
//! # CF$UID dictionaries
//!
//! A dictionary with exactly one entry, `"CF$UID"`, whose value is a
//! non-negative integer is read as a UID. This is how UIDs are spelled in
//! dialects without `<*U>`. It can be switched off with
//! [`ParseOptions::with_cfuid_collapsing`](crate::ParseOptions::with_cfuid_collapsing).
//!
//! # Dialects
//!
//! Output targets one of three [`Dialect`](crate::Dialect)s. Reading accepts
//! all of them regardless.
//!
//! - **OpenStep**: strings, arrays, dictionaries and hex data only. Numbers
//!   are written as bare words, booleans as `YES`/`NO`, dates as quoted
//!   strings, null as `""`.
//! - **GNUstep**: adds `<*I>`, `<*R>`, `<*B>`, `<*D>`, and base64 for data
//!   shorter than five bytes.
//! - **ExtendedText**: adds `<*U>` and `<*N>`.
//!
//! Reading OpenStep output gives back strings where numbers and booleans were
//! written; the serde deserializer converts them back when the target type
//! asks for a number or `bool`.
//!
//! # Strings files
//!
//! With `strings_file` set on [`ParseOptions`](crate::ParseOptions) or
//! [`WriteOptions`](crate::WriteOptions), the top level is a dictionary written
//! without braces:
//!
//! ```text
//! "greeting" = "Hello";
//! "farewell" = "Goodbye";
//! "untranslated";
//! ```
