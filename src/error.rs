//! Error types for text plist parsing and writing.
//!
//! ## Error Categories
//!
//! - **Grammar Errors**: Malformed input, with byte offset, line/column and the
//!   token classes the parser expected at that point
//! - **Unrepresentable Values**: The chosen [`Dialect`](crate::Dialect) cannot encode a
//!   value and fallback is disabled
//! - **Key Type Errors**: A non-string map key was met while converting serde data
//! - **Encoding Errors**: Input bytes (or output text) do not fit the declared encoding
//! - **I/O Errors**: Reading from a source or writing to a sink failed
//!
//! A failed parse never yields a partial value, and nothing here is retried
//! internally; deciding whether to try again with other options is up to the caller.
//!
//! ## Examples
//!
//! ```rust
//! use serde_textplist::{parse_str, Error, ParseOptions};
//!
//! let result = parse_str("{ a = (1, 2; }", &ParseOptions::default());
//!
//! match result {
//!     Err(Error::Grammar { line, .. }) => assert_eq!(line, 1),
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while reading or writing text plists.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed input. `offset` is a byte offset into the decoded text.
    #[error("Grammar error at line {line}, column {col} (offset {offset}): expected {expected}")]
    Grammar {
        offset: usize,
        line: usize,
        col: usize,
        expected: String,
    },

    /// The dialect has no way to encode the value and fallback is off.
    #[error("{kind} is not representable in the {dialect} dialect")]
    UnrepresentableValue { kind: String, dialect: String },

    /// A map key that is not a string, with key skipping disabled.
    #[error("Dictionary keys must be strings, found {0}")]
    KeyType(String),

    /// The declared text encoding could not decode (or encode) the document.
    #[error("Encoding error ({encoding}): {msg}")]
    Encoding { encoding: String, msg: String },

    /// No format registered under the requested key, or none detected.
    #[error("Unknown plist format: {0}")]
    UnknownFormat(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a grammar error, deriving line and column from `offset` in `input`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_textplist::Error;
    ///
    /// let err = Error::grammar("{\n  a = ", 8, "value");
    /// assert!(err.to_string().contains("line 2"));
    /// ```
    pub fn grammar(input: &str, offset: usize, expected: &str) -> Self {
        let offset = offset.min(input.len());
        let before = &input[..offset];
        let line = before.matches('\n').count() + 1;
        let col = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Error::Grammar {
            offset,
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates an error for a value the dialect cannot write.
    pub fn unrepresentable(kind: &str, dialect: crate::Dialect) -> Self {
        Error::UnrepresentableValue {
            kind: kind.to_string(),
            dialect: dialect.to_string(),
        }
    }

    /// Creates a key type error naming the offending key kind.
    pub fn key_type(found: &str) -> Self {
        Error::KeyType(found.to_string())
    }

    /// Creates an encoding error for the named encoding.
    pub fn encoding(encoding: &str, msg: &str) -> Self {
        Error::Encoding {
            encoding: encoding.to_string(),
            msg: msg.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_textplist::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for source/sink failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
