//! A table of plist codecs selected by name or by sniffing.
//!
//! Each codec registers three operations under a format key: a detector that
//! looks at the first bytes of a document, a parser factory and a writer
//! factory. The registry is an ordinary value owned by the caller; nothing
//! here is global. [`FormatRegistry::default`] knows only this crate's text
//! codec under [`TEXT_FORMAT`]; binary or XML codecs are registered by the host.
//!
//! ```rust
//! use serde_textplist::{FormatRegistry, ParseOptions, Value, WriteOptions, TEXT_FORMAT};
//!
//! let registry = FormatRegistry::default();
//! let value = registry.load(b"{ a = 1; }", None, &ParseOptions::default()).unwrap();
//! assert_eq!(registry.detect(b"{ a = 1; }"), Some(TEXT_FORMAT));
//!
//! let mut out = Vec::new();
//! registry.dump(&value, &mut out, TEXT_FORMAT, &WriteOptions::default()).unwrap();
//! assert_eq!(out, b"{\n\t\"a\" = \"1\";\n}");
//! ```

use crate::sniff::{looks_like_text_plist, HEADER_LEN};
use crate::{Error, ParseOptions, Result, Value, WriteOptions, Writer};
use indexmap::IndexMap;
use std::io;

/// Key under which the text codec is registered by default.
pub const TEXT_FORMAT: &str = "text";

/// A configured parser for one format.
pub trait PlistReader {
    fn read(&self, bytes: &[u8]) -> Result<Value>;
}

/// A configured writer bound to an output sink.
pub trait PlistWriter {
    fn write_value(&mut self, value: &Value) -> Result<()>;
}

pub type DetectFn = fn(&[u8]) -> bool;
pub type ParserFactory = fn(ParseOptions) -> Box<dyn PlistReader>;
pub type WriterFactory =
    for<'w> fn(Box<dyn io::Write + 'w>, WriteOptions) -> Box<dyn PlistWriter + 'w>;

/// The three operations a codec contributes to a [`FormatRegistry`].
#[derive(Clone, Copy)]
pub struct FormatHandler {
    pub detect: DetectFn,
    pub make_parser: ParserFactory,
    pub make_writer: WriterFactory,
}

/// Reads text plists with fixed options.
pub struct TextReader {
    options: ParseOptions,
}

impl TextReader {
    pub fn new(options: ParseOptions) -> Self {
        TextReader { options }
    }
}

impl PlistReader for TextReader {
    fn read(&self, bytes: &[u8]) -> Result<Value> {
        crate::parse_slice(bytes, &self.options)
    }
}

impl<W: io::Write> PlistWriter for Writer<W> {
    fn write_value(&mut self, value: &Value) -> Result<()> {
        self.write(value)?;
        self.flush()
    }
}

fn make_text_parser(options: ParseOptions) -> Box<dyn PlistReader> {
    Box::new(TextReader::new(options))
}

fn make_text_writer<'w>(
    sink: Box<dyn io::Write + 'w>,
    options: WriteOptions,
) -> Box<dyn PlistWriter + 'w> {
    Box::new(Writer::new(sink, options))
}

/// Format handlers keyed by name, consulted in registration order.
pub struct FormatRegistry {
    formats: IndexMap<String, FormatHandler>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = FormatRegistry::new();
        registry.register_format(
            TEXT_FORMAT,
            looks_like_text_plist,
            make_text_parser,
            make_text_writer,
        );
        registry
    }
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        FormatRegistry {
            formats: IndexMap::new(),
        }
    }

    /// Registers (or replaces) the handler for `key`.
    pub fn register_format(
        &mut self,
        key: impl Into<String>,
        detect: DetectFn,
        make_parser: ParserFactory,
        make_writer: WriterFactory,
    ) {
        let key = key.into();
        log::debug!("registering plist format '{}'", key);
        self.formats.insert(
            key,
            FormatHandler {
                detect,
                make_parser,
                make_writer,
            },
        );
    }

    pub fn handler(&self, key: &str) -> Option<&FormatHandler> {
        self.formats.get(key)
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    /// Returns the first registered format whose detector accepts `header`.
    pub fn detect(&self, header: &[u8]) -> Option<&str> {
        let header = &header[..header.len().min(HEADER_LEN)];
        let found = self
            .formats
            .iter()
            .find(|(_, handler)| (handler.detect)(header))
            .map(|(key, _)| key.as_str());
        log::debug!("detected plist format: {:?}", found);
        found
    }

    /// Parses `bytes` with the named format, or the detected one when `format` is `None`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFormat`] when the key is not registered or nothing
    /// matches; otherwise whatever the format's parser reports.
    pub fn load(
        &self,
        bytes: &[u8],
        format: Option<&str>,
        options: &ParseOptions,
    ) -> Result<Value> {
        let key = match format {
            Some(key) => key,
            None => self
                .detect(bytes)
                .ok_or_else(|| Error::UnknownFormat("no registered format matches the input".to_string()))?,
        };
        let handler = self.lookup(key)?;
        (handler.make_parser)(options.clone()).read(bytes)
    }

    /// Writes `value` to `sink` with the named format.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownFormat`] when the key is not registered; otherwise
    /// whatever the format's writer reports.
    pub fn dump<'w, W: io::Write + 'w>(
        &self,
        value: &Value,
        sink: W,
        format: &str,
        options: &WriteOptions,
    ) -> Result<()> {
        let handler = self.lookup(format)?;
        let mut writer = (handler.make_writer)(Box::new(sink), options.clone());
        writer.write_value(value)
    }

    fn lookup(&self, key: &str) -> Result<&FormatHandler> {
        self.formats
            .get(key)
            .ok_or_else(|| Error::UnknownFormat(key.to_string()))
    }
}
