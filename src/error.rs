//! Error types for SNBT decoding and encoding.
//!
//! Every failure the codec can report is a variant of [`Error`]. Decoding
//! errors carry the byte offset of the offending input together with a
//! 1-based line and column so callers can point users at the problem.
//!
//! ## Error Categories
//!
//! - **Lex errors**: a character sequence that is not a token
//! - **Syntax errors**: tokens in an order the grammar does not allow
//! - **Number range errors**: an unsuffixed integer that does not fit in `i64`
//! - **Encode errors**: a value that has no SNBT representation
//!
//! ## Examples
//!
//! ```rust
//! use serde_snbt::{decode, Error};
//!
//! let err = decode("{ a: [1, 2 }").unwrap_err();
//! assert!(err.is_syntax());
//! assert_eq!(err.offset(), Some(11));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by the codec.
///
/// Errors are terminal: a failed decode never yields a partial value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid character sequence in the input.
    #[error("Lex error at line {line}, column {col} (offset {offset}): {msg}")]
    Lex {
        offset: usize,
        line: usize,
        col: usize,
        msg: String,
    },

    /// Token sequence that violates the grammar.
    #[error("Syntax error at line {line}, column {col} (offset {offset}): expected {expected}, found {found}")]
    Syntax {
        offset: usize,
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },

    /// Unsuffixed integer literal outside the `i64` range.
    #[error("Number out of range at line {line}, column {col} (offset {offset}): {literal} does not fit in a 64-bit integer")]
    NumberRange {
        offset: usize,
        line: usize,
        col: usize,
        literal: String,
    },

    /// Containers nested deeper than the configured limit.
    #[error("Nesting too deep at line {line}, column {col} (offset {offset}): limit is {limit}")]
    DepthLimit {
        offset: usize,
        line: usize,
        col: usize,
        limit: usize,
    },

    /// Value that cannot be written as SNBT.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Attempt to encode a missing value (`None` or unit).
    #[error("Encode error: cannot encode an absent value")]
    Absent,

    /// Numeric literal whose parts violate the literal invariants.
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    /// Broken builder invariant. Indicates a defect in the parser, not bad input.
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error raised through serde
    #[error("Error: {0}")]
    Custom(String),
}

/// Line and column of a byte offset, both 1-based.
pub(crate) fn locate(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let before = &input.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    // Columns count characters, not bytes.
    let col = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;
    (line, col)
}

impl Error {
    /// Creates a lex error at `offset` within `input`.
    pub fn lex(input: &str, offset: usize, msg: &str) -> Self {
        let (line, col) = locate(input, offset);
        Error::Lex {
            offset,
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a syntax error describing what was expected and what was found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_snbt::Error;
    ///
    /// let err = Error::syntax("{ a 1 }", 4, "':'", "number `1`");
    /// assert!(err.to_string().contains("expected ':'"));
    /// assert!(err.to_string().contains("column 5"));
    /// ```
    pub fn syntax(input: &str, offset: usize, expected: &str, found: &str) -> Self {
        let (line, col) = locate(input, offset);
        Error::Syntax {
            offset,
            line,
            col,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a number range error for an integer literal.
    pub fn number_range(input: &str, offset: usize, literal: &str) -> Self {
        let (line, col) = locate(input, offset);
        Error::NumberRange {
            offset,
            line,
            col,
            literal: literal.to_string(),
        }
    }

    /// Creates a nesting depth error.
    pub fn depth_limit(input: &str, offset: usize, limit: usize) -> Self {
        let (line, col) = locate(input, offset);
        Error::DepthLimit {
            offset,
            line,
            col,
            limit,
        }
    }

    /// Creates an encode error for a value that has no SNBT form.
    pub fn encode<T: fmt::Display>(msg: T) -> Self {
        Error::Encode(msg.to_string())
    }

    /// Creates an invalid literal error.
    pub fn invalid_literal<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidLiteral(msg.to_string())
    }

    /// Creates an internal consistency error.
    pub fn internal<T: fmt::Display>(msg: T) -> Self {
        Error::Internal(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_snbt::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns `true` for syntax errors.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax { .. })
    }

    /// Returns `true` for errors raised while encoding.
    #[must_use]
    pub fn is_encode(&self) -> bool {
        matches!(self, Error::Encode(_) | Error::Absent)
    }

    /// Byte offset into the decoded input, for errors that have one.
    #[must_use]
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Lex { offset, .. }
            | Error::Syntax { offset, .. }
            | Error::NumberRange { offset, .. }
            | Error::DepthLimit { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_counts_lines_and_chars() {
        let input = "{\n  title: \"αβ\" x }";
        assert_eq!(locate(input, 0), (1, 1));
        assert_eq!(locate(input, 2), (2, 1));
        let x = input.find('x').unwrap();
        assert_eq!(locate(input, x), (2, 15));
    }

    #[test]
    fn test_locate_clamps_past_end() {
        assert_eq!(locate("ab", 10), (1, 3));
    }

    #[test]
    fn test_offset_accessor() {
        assert_eq!(Error::lex("abc", 2, "bad").offset(), Some(2));
        assert_eq!(Error::Absent.offset(), None);
        assert!(Error::Absent.is_encode());
        assert!(!Error::custom("x").is_encode());
    }
}
