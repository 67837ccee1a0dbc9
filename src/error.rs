//! Error types for parsing and deserialization.
//!
//! Every error carries the source line it was detected on (and the column,
//! for errors raised by the [`scanner`](crate::scanner)). Parsing is
//! all-or-nothing: the first error aborts the parse and no partial
//! [`Document`](crate::Document) is ever returned.
//!
//! ## Error Categories
//!
//! - **Lexical**: an unexpected character while tokenizing
//! - **Structural**: lines that match no rule, redefined keys, unclosed arrays
//! - **Classification**: value text that is not a valid scalar or array
//! - **I/O**: the source file could not be opened or read
//!
//! ## Examples
//!
//! ```rust
//! use serde_tomlite::{parse, Error};
//!
//! let err = parse("pi = .14").unwrap_err();
//! assert!(matches!(err, Error::InvalidFloat { line: 1, .. }));
//! assert_eq!(err.line(), Some(1));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while parsing a document or
/// deserializing from it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The scanner found a character no token rule accepts.
    #[error("Unexpected character {ch:?} on line {line} at column {column}")]
    UnexpectedCharacter { ch: char, line: usize, column: usize },

    /// A quoted string has no closing quote on its line.
    #[error("Unterminated string on line {line}")]
    UnterminatedString { line: usize },

    /// An array has no closing bracket, or a bracket is unbalanced.
    #[error("Unterminated array on line {line}")]
    UnterminatedArray { line: usize },

    /// A logical line is neither blank, a header, nor an assignment.
    #[error("Invalid syntax `{text}` on line {line}")]
    InvalidLine { text: String, line: usize },

    /// Value text matched none of the classification rules.
    #[error("Unknown value type for `{text}` on line {line}")]
    UnknownValueType { text: String, line: usize },

    /// Numeric-looking text that is not a well-formed float (e.g. `.5`).
    #[error("Invalid float `{text}` on line {line}")]
    InvalidFloat { text: String, line: usize },

    /// Integer-looking text that does not fit in an `i64`.
    #[error("Invalid integer `{text}` on line {line}")]
    InvalidInteger { text: String, line: usize },

    /// Date-time shaped text with malformed or out-of-range components.
    #[error("Invalid date-time `{text}` on line {line}")]
    InvalidDateTime { text: String, line: usize },

    /// Unknown backslash escape or malformed `\uXXXX` sequence.
    #[error("Invalid escape sequence `{sequence}` on line {line}")]
    InvalidEscape { sequence: String, line: usize },

    /// Array elements do not all share one value kind.
    #[error("Mixed array types on line {line}: expected {expected}, found {found}")]
    MixedArrayTypes {
        expected: String,
        found: String,
        line: usize,
    },

    /// A key was assigned twice, or a header collides with an existing key.
    #[error("Key `{key}` has already been defined (line {line})")]
    KeyRedefinition { key: String, line: usize },

    /// Arrays nested deeper than the configured limit.
    #[error("Arrays nested deeper than {limit} levels on line {line}")]
    NestingTooDeep { limit: usize, line: usize },

    /// The source file is missing or cannot be read.
    #[error("`{path}` does not exist or cannot be read: {reason}")]
    SourceUnavailable { path: String, reason: String },

    /// Generic message, used by Serde deserialization.
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates an unexpected character error at a scanner position.
    pub fn unexpected_character(ch: char, line: usize, column: usize) -> Self {
        Error::UnexpectedCharacter { ch, line, column }
    }

    /// Creates an invalid line error, keeping the raw line text.
    pub fn invalid_line(text: &str, line: usize) -> Self {
        Error::InvalidLine {
            text: text.to_string(),
            line,
        }
    }

    /// Creates an unknown value type error.
    pub fn unknown_value_type(text: &str, line: usize) -> Self {
        Error::UnknownValueType {
            text: text.to_string(),
            line,
        }
    }

    /// Creates an invalid float error.
    pub fn invalid_float(text: &str, line: usize) -> Self {
        Error::InvalidFloat {
            text: text.to_string(),
            line,
        }
    }

    /// Creates an invalid integer error.
    pub fn invalid_integer(text: &str, line: usize) -> Self {
        Error::InvalidInteger {
            text: text.to_string(),
            line,
        }
    }

    /// Creates an invalid date-time error.
    pub fn invalid_datetime(text: &str, line: usize) -> Self {
        Error::InvalidDateTime {
            text: text.to_string(),
            line,
        }
    }

    /// Creates an invalid escape error for the offending sequence.
    pub fn invalid_escape(sequence: &str, line: usize) -> Self {
        Error::InvalidEscape {
            sequence: sequence.to_string(),
            line,
        }
    }

    /// Creates a mixed array types error from the two kind names.
    pub fn mixed_array_types(expected: &str, found: &str, line: usize) -> Self {
        Error::MixedArrayTypes {
            expected: expected.to_string(),
            found: found.to_string(),
            line,
        }
    }

    /// Creates a key redefinition error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tomlite::Error;
    ///
    /// let err = Error::key_redefinition("fruit.type", 4);
    /// assert!(err.to_string().contains("fruit.type"));
    /// ```
    pub fn key_redefinition(key: &str, line: usize) -> Self {
        Error::KeyRedefinition {
            key: key.to_string(),
            line,
        }
    }

    /// Creates a source unavailable error for a path that could not be read.
    pub fn source_unavailable(path: &str, reason: &str) -> Self {
        Error::SourceUnavailable {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    /// Returns the source line the error was detected on, if it has one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::UnexpectedCharacter { line, .. }
            | Error::UnterminatedString { line }
            | Error::UnterminatedArray { line }
            | Error::InvalidLine { line, .. }
            | Error::UnknownValueType { line, .. }
            | Error::InvalidFloat { line, .. }
            | Error::InvalidInteger { line, .. }
            | Error::InvalidDateTime { line, .. }
            | Error::InvalidEscape { line, .. }
            | Error::MixedArrayTypes { line, .. }
            | Error::KeyRedefinition { line, .. }
            | Error::NestingTooDeep { line, .. } => Some(*line),
            Error::SourceUnavailable { .. } | Error::Message(_) => None,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_position() {
        let err = Error::unexpected_character('.', 5, 6);
        assert_eq!(
            err.to_string(),
            "Unexpected character '.' on line 5 at column 6"
        );
    }

    #[test]
    fn test_line_accessor() {
        assert_eq!(Error::UnterminatedArray { line: 3 }.line(), Some(3));
        assert_eq!(Error::key_redefinition("a", 7).line(), Some(7));
        assert_eq!(Error::source_unavailable("x.toml", "missing").line(), None);
        assert_eq!(Error::custom("boom").line(), None);
    }

    #[test]
    fn test_serde_custom() {
        let err = <Error as serde::de::Error>::custom("missing field `name`");
        assert_eq!(err, Error::Message("missing field `name`".to_string()));
    }
}
