//! Grammar engine for text plists.
//!
//! A hand-written recursive-descent parser with PEG semantics: every rule is an
//! ordered choice, the first alternative that matches wins, and a failed
//! alternative rewinds to where it started. The result is a borrowed parse tree
//! ([`Document`]) that still holds raw literal text; [`semantics`](crate::semantics)
//! turns it into a [`Value`](crate::Value).
//!
//! Whitespace, `/* block */` comments and `// line` comments are skipped before
//! every token, including the tag, quotes and body of a typed literal, but
//! never inside a quoted string or unquoted run.
//!
//! When nothing matches, the error points at the furthest offset any alternative
//! reached and lists what was expected there. Containers nested deeper than
//! [`MAX_DEPTH`] are rejected the same way.
//!
//! ```rust
//! use serde_textplist::grammar::{parse, Document, Node};
//!
//! let tree = parse("( a, <*I1>, )").unwrap();
//! match tree {
//!     Document::Value(Node::Array(items)) => assert_eq!(items.len(), 2),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

use crate::{Error, Result};

/// Deepest nesting of dictionaries and arrays accepted by the parser and the writer.
pub const MAX_DEPTH: usize = 256;

/// Top level of a document: one value, or a brace-less run of entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Document<'a> {
    Value(Node<'a>),
    Entries(Vec<Entry<'a>>),
}

/// `key = value;` or `key;`
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<'a> {
    pub key: StringNode<'a>,
    pub value: Option<Node<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Dict(Vec<Entry<'a>>),
    Array(Vec<Node<'a>>),
    String(StringNode<'a>),
    /// Runs of hex digits, each of even length.
    HexData(Vec<&'a str>),
    Base64Data {
        body: &'a str,
        offset: usize,
    },
    Typed {
        literal: TypedLiteral<'a>,
        offset: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringNode<'a> {
    Unquoted(&'a str),
    Quoted(Vec<QuotedPart<'a>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuotedPart<'a> {
    Raw(&'a str),
    Escape(Escape),
}

/// A decoded backslash escape. Code units are kept as UTF-16 so that
/// surrogate halves from consecutive `\u` escapes can be merged later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// `\a \b \t \r \n \v \f`
    Control(char),
    /// `\uXXXX`
    Unicode(u16),
    /// `\xXX`
    Hex(u8),
    /// One to three octal digits.
    Octal(u16),
    /// Anything else stands for itself.
    Literal(char),
}

/// The body of a `<*X...>` literal, still as text.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedLiteral<'a> {
    Int(&'a str),
    Uid(&'a str),
    Real(&'a str),
    Bool(bool),
    Date(&'a str),
    Null,
}

/// Parses a complete document, accepting either top-level form.
///
/// # Errors
///
/// Returns [`Error::Grammar`] when the input does not match, including when
/// trailing text remains after a complete value.
pub fn parse(input: &str) -> Result<Document<'_>> {
    parse_document(input, false)
}

/// Parses a strings-file document: entries only, no enclosing braces.
///
/// # Errors
///
/// Returns [`Error::Grammar`] when the input is not a sequence of entries.
pub fn parse_entries(input: &str) -> Result<Document<'_>> {
    parse_document(input, true)
}

fn parse_document(input: &str, entries_only: bool) -> Result<Document<'_>> {
    let mut grammar = Grammar::new(input);
    match grammar.document(entries_only) {
        Ok(document) => Ok(document),
        Err(Backtrack) => Err(grammar.error()),
    }
}

/// A rule did not match; the reason is recorded in [`Grammar::expected`].
#[derive(Debug)]
struct Backtrack;

type Parsed<T> = std::result::Result<T, Backtrack>;

fn is_safe_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-#!$%&*+./:?@^_|~".contains(&b)
}

fn hex_prefix(s: &str, n: usize) -> Option<u32> {
    let digits = s.get(..n)?;
    if digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        u32::from_str_radix(digits, 16).ok()
    } else {
        None
    }
}

fn count_digits(s: &[u8], from: usize) -> usize {
    s.get(from..)
        .map(|tail| tail.iter().take_while(|b| b.is_ascii_digit()).count())
        .unwrap_or(0)
}

struct Grammar<'a> {
    input: &'a str,
    pos: usize,
    furthest: usize,
    expected: Vec<String>,
    depth: usize,
}

impl<'a> Grammar<'a> {
    fn new(input: &'a str) -> Self {
        Grammar {
            input,
            pos: 0,
            furthest: 0,
            expected: Vec::new(),
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Records a failed expectation at the current position.
    fn expect(&mut self, what: &str) -> Backtrack {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest && !self.expected.iter().any(|e| e == what) {
            self.expected.push(what.to_string());
        }
        Backtrack
    }

    fn error(&self) -> Error {
        let expected = if self.expected.is_empty() {
            "value".to_string()
        } else {
            self.expected.join(", ")
        };
        Error::grammar(self.input, self.furthest, &expected)
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if let Some(body) = trimmed.strip_prefix("/*") {
                match body.find("*/") {
                    Some(end) => self.pos += end + 4,
                    // Unterminated: leave it for the rules to reject.
                    None => return,
                }
            } else if trimmed.starts_with("//") {
                match trimmed.find('\n') {
                    Some(end) => self.pos += end,
                    None => self.pos = self.input.len(),
                }
            } else {
                return;
            }
        }
    }

    fn token(&mut self, tok: &str) -> Parsed<()> {
        self.skip_trivia();
        if self.rest().starts_with(tok) {
            self.pos += tok.len();
            Ok(())
        } else {
            Err(self.expect(&format!("'{}'", tok)))
        }
    }

    /// Like [`Grammar::token`], but rewinds on a miss.
    fn optional_token(&mut self, tok: &str) -> bool {
        let start = self.pos;
        if self.token(tok).is_ok() {
            true
        } else {
            self.pos = start;
            false
        }
    }

    fn end_of_input(&mut self) -> Parsed<()> {
        self.skip_trivia();
        if self.at_end() {
            Ok(())
        } else {
            Err(self.expect("end of input"))
        }
    }

    fn document(&mut self, entries_only: bool) -> Parsed<Document<'a>> {
        if !entries_only {
            if let Ok(value) = self.value() {
                if self.end_of_input().is_ok() {
                    return Ok(Document::Value(value));
                }
            }
            self.pos = 0;
        }
        let entries = self.entries();
        self.end_of_input()?;
        Ok(Document::Entries(entries))
    }

    fn entries(&mut self) -> Vec<Entry<'a>> {
        let mut entries = Vec::new();
        loop {
            let start = self.pos;
            match self.entry() {
                Ok(entry) => entries.push(entry),
                Err(Backtrack) => {
                    self.pos = start;
                    return entries;
                }
            }
        }
    }

    fn entry(&mut self) -> Parsed<Entry<'a>> {
        let key = self.string()?;
        let value = if self.optional_token("=") {
            Some(self.value()?)
        } else {
            None
        };
        self.token(";")?;
        Ok(Entry { key, value })
    }

    fn value(&mut self) -> Parsed<Node<'a>> {
        let alternatives: [fn(&mut Self) -> Parsed<Node<'a>>; 6] = [
            Self::dict,
            Self::array,
            Self::string_value,
            Self::hex_data,
            Self::base64_data,
            Self::typed,
        ];
        let start = self.pos;
        for alternative in alternatives {
            match alternative(self) {
                Ok(node) => return Ok(node),
                Err(Backtrack) => self.pos = start,
            }
        }
        Err(Backtrack)
    }

    /// Runs a container body one level deeper, failing past [`MAX_DEPTH`].
    fn nested<T>(&mut self, body: impl FnOnce(&mut Self) -> Parsed<T>) -> Parsed<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.expect("shallower nesting"));
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    fn dict(&mut self) -> Parsed<Node<'a>> {
        self.token("{")?;
        self.nested(|g| {
            let entries = g.entries();
            g.token("}")?;
            Ok(Node::Dict(entries))
        })
    }

    fn array(&mut self) -> Parsed<Node<'a>> {
        self.token("(")?;
        self.nested(Self::array_body)
    }

    fn array_body(&mut self) -> Parsed<Node<'a>> {
        let mut items = Vec::new();
        let start = self.pos;
        match self.value() {
            Ok(first) => {
                items.push(first);
                loop {
                    let before_comma = self.pos;
                    if !self.optional_token(",") {
                        break;
                    }
                    match self.value() {
                        Ok(item) => items.push(item),
                        Err(Backtrack) => {
                            self.pos = before_comma;
                            break;
                        }
                    }
                }
            }
            Err(Backtrack) => self.pos = start,
        }
        // trailing comma
        self.optional_token(",");
        self.token(")")?;
        Ok(Node::Array(items))
    }

    fn string_value(&mut self) -> Parsed<Node<'a>> {
        self.string().map(Node::String)
    }

    fn string(&mut self) -> Parsed<StringNode<'a>> {
        self.skip_trivia();
        let rest = self.rest();
        let safe = rest.bytes().take_while(|b| is_safe_byte(*b)).count();
        if safe > 0 {
            self.pos += safe;
            return Ok(StringNode::Unquoted(&rest[..safe]));
        }
        if !rest.starts_with('"') {
            return Err(self.expect("string"));
        }
        self.pos += 1;

        let mut parts = Vec::new();
        loop {
            let rest = self.rest();
            let run = rest.find(['"', '\\']).unwrap_or(rest.len());
            if run > 0 {
                parts.push(QuotedPart::Raw(&rest[..run]));
                self.pos += run;
                continue;
            }
            match rest.as_bytes().first() {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(StringNode::Quoted(parts));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    parts.push(QuotedPart::Escape(self.escape()?));
                }
                _ => return Err(self.expect("'\"'")),
            }
        }
    }

    fn escape(&mut self) -> Parsed<Escape> {
        let rest = self.rest();
        let first = match rest.chars().next() {
            Some(c) => c,
            None => return Err(self.expect("escape sequence")),
        };

        let control = match first {
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'n' => Some('\n'),
            'v' => Some('\u{0B}'),
            'f' => Some('\u{0C}'),
            _ => None,
        };
        if let Some(c) = control {
            self.pos += 1;
            return Ok(Escape::Control(c));
        }

        if first == 'u' || first == 'U' {
            if let Some(unit) = hex_prefix(&rest[1..], 4) {
                self.pos += 5;
                return Ok(Escape::Unicode(unit as u16));
            }
        }
        if first == 'x' {
            if let Some(byte) = hex_prefix(&rest[1..], 2) {
                self.pos += 3;
                return Ok(Escape::Hex(byte as u8));
            }
        }

        let octal = rest
            .bytes()
            .take(3)
            .take_while(|b| (b'0'..=b'7').contains(b))
            .count();
        if octal > 0 {
            let code = rest.as_bytes()[..octal]
                .iter()
                .fold(0u16, |acc, b| acc * 8 + u16::from(b - b'0'));
            self.pos += octal;
            return Ok(Escape::Octal(code));
        }

        self.pos += first.len_utf8();
        Ok(Escape::Literal(first))
    }

    fn hex_data(&mut self) -> Parsed<Node<'a>> {
        self.token("<")?;
        let mut runs = Vec::new();
        loop {
            self.skip_trivia();
            let rest = self.rest();
            let digits = rest.bytes().take_while(u8::is_ascii_hexdigit).count();
            let even = digits - digits % 2;
            if even == 0 {
                break;
            }
            runs.push(&rest[..even]);
            self.pos += even;
        }
        self.token(">")?;
        Ok(Node::HexData(runs))
    }

    fn base64_data(&mut self) -> Parsed<Node<'a>> {
        self.token("<[")?;
        let offset = self.pos;
        let rest = self.rest();
        let len = rest.find(']').unwrap_or(rest.len());
        self.pos += len;
        self.token("]>")?;
        Ok(Node::Base64Data {
            body: &rest[..len],
            offset,
        })
    }

    fn typed(&mut self) -> Parsed<Node<'a>> {
        self.token("<*")?;
        let offset = self.pos;
        let literal = self.typed_body()?;
        self.token(">")?;
        Ok(Node::Typed { literal, offset })
    }

    fn typed_body(&mut self) -> Parsed<TypedLiteral<'a>> {
        self.skip_trivia();
        let tag = match self.rest().as_bytes().first() {
            Some(tag) => *tag,
            None => return Err(self.expect("type tag")),
        };
        let literal = match tag {
            b'I' => {
                self.pos += 1;
                self.quoted_literal(|g| g.integer(true).map(TypedLiteral::Int))?
            }
            b'U' => {
                self.pos += 1;
                self.quoted_literal(|g| g.integer(false).map(TypedLiteral::Uid))?
            }
            b'R' => {
                self.pos += 1;
                self.quoted_literal(|g| g.real().map(TypedLiteral::Real))?
            }
            b'B' => {
                self.pos += 1;
                self.quoted_literal(Self::boolean)?
            }
            b'D' => {
                self.pos += 1;
                self.quoted_literal(Self::date)?
            }
            b'N' => {
                self.pos += 1;
                TypedLiteral::Null
            }
            _ => return Err(self.expect("type tag (I, U, R, B, D or N)")),
        };
        Ok(literal)
    }

    /// The literal may be wrapped in double quotes; either quote is optional.
    fn quoted_literal<T>(&mut self, body: impl FnOnce(&mut Self) -> Parsed<T>) -> Parsed<T> {
        self.skip_trivia();
        if self.rest().starts_with('"') {
            self.pos += 1;
            self.skip_trivia();
        }
        let literal = body(self)?;
        self.skip_trivia();
        if self.rest().starts_with('"') {
            self.pos += 1;
        }
        Ok(literal)
    }

    fn integer(&mut self, signed: bool) -> Parsed<&'a str> {
        let rest = self.rest();
        let sign = usize::from(signed && rest.starts_with('-'));
        let digits = count_digits(rest.as_bytes(), sign);
        if digits == 0 {
            self.pos += sign;
            return Err(self.expect("digits"));
        }
        self.pos += sign + digits;
        Ok(&rest[..sign + digits])
    }

    fn real(&mut self) -> Parsed<&'a str> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut end = usize::from(rest.starts_with('-'));

        if let Some(word) = rest.get(end..end + 3) {
            if word.eq_ignore_ascii_case("nan") || word.eq_ignore_ascii_case("inf") {
                end += 3;
                self.pos += end;
                return Ok(&rest[..end]);
            }
        }

        let int_digits = count_digits(bytes, end);
        end += int_digits;
        let mut frac_digits = 0;
        if bytes.get(end) == Some(&b'.') {
            let digits = count_digits(bytes, end + 1);
            if int_digits > 0 || digits > 0 {
                end += 1 + digits;
                frac_digits = digits;
            }
        }
        if int_digits == 0 && frac_digits == 0 {
            self.pos += end;
            return Err(self.expect("real number"));
        }

        if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
                exp += 1;
            }
            let digits = count_digits(bytes, exp);
            if digits > 0 {
                end = exp + digits;
            }
        }

        self.pos += end;
        Ok(&rest[..end])
    }

    fn boolean(&mut self) -> Parsed<TypedLiteral<'a>> {
        let value = match self.rest().as_bytes().first() {
            Some(b'Y') => true,
            Some(b'N') => false,
            _ => return Err(self.expect("'Y' or 'N'")),
        };
        self.pos += 1;
        Ok(TypedLiteral::Bool(value))
    }

    fn date(&mut self) -> Parsed<TypedLiteral<'a>> {
        let rest = self.rest();
        let len = rest.find(['>', '"']).unwrap_or(rest.len());
        let date = rest[..len].trim_end();
        if date.is_empty() {
            return Err(self.expect("date"));
        }
        self.pos += len;
        Ok(TypedLiteral::Date(date))
    }
}
