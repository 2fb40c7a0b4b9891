//! Syntax errors raised while reading command input.
//!
//! [`CommandSyntaxError`] is the only recoverable failure in this crate. It
//! pairs a [`SyntaxErrorKind`] with a snapshot of the [`StringReader`] taken
//! at the moment of failure, so callers can report exactly where the input
//! went wrong.

use thiserror::Error;

use crate::StringReader;

/// Number of consumed characters shown before the failure marker in
/// [`CommandSyntaxError::context`].
const CONTEXT_AMOUNT: usize = 10;

/// What went wrong while reading a token.
///
/// The `Display` impl is the human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// No digit where a 32-bit integer should start.
    #[error("Expected int")]
    ExpectedInt,
    /// Digits were found but do not fit in a 32-bit integer.
    #[error("Invalid int")]
    InvalidInt,
    /// No digit where a 64-bit integer should start.
    #[error("Expected long")]
    ExpectedLong,
    /// Digits were found but do not fit in a 64-bit integer.
    #[error("Invalid long")]
    InvalidLong,
    /// No digit where a single-precision number should start.
    #[error("Expected float")]
    ExpectedFloat,
    /// The numeric token could not be converted (e.g. `1e`).
    #[error("Invalid float")]
    InvalidFloat,
    /// No digit where a double-precision number should start.
    #[error("Expected double")]
    ExpectedDouble,
    /// The numeric token could not be converted (e.g. `1e`).
    #[error("Invalid double")]
    InvalidDouble,
    /// The token is neither `true` nor `false`.
    #[error("Expected boolean")]
    ExpectedBool,
    /// No unquoted word at the cursor.
    #[error("Expected word")]
    ExpectedWord,
    /// A bounded argument read a value below its minimum.
    #[error("Value must not be less than {min}, found {found}")]
    TooLow { found: String, min: String },
    /// A bounded argument read a value above its maximum.
    #[error("Value must not be more than {max}, found {found}")]
    TooHigh { found: String, max: String },
    /// Failure reported by a caller-supplied argument parser.
    #[error("{0}")]
    Custom(String),
}

/// A recoverable lexical failure at a specific reader position.
///
/// Displays as `"<message> at position <cursor>"`.
///
/// # Examples
///
/// ```
/// use marshal_core::{StringReader, SyntaxErrorKind};
///
/// let mut reader = StringReader::new("give abc");
/// reader.set_cursor(5);
/// let err = reader.read_int().unwrap_err();
///
/// assert_eq!(err.kind(), &SyntaxErrorKind::ExpectedInt);
/// assert_eq!(err.cursor(), 5);
/// assert_eq!(err.to_string(), "Expected int at position 5");
/// assert_eq!(err.context(), "give <--[HERE]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {}", .reader.cursor())]
pub struct CommandSyntaxError {
    kind: SyntaxErrorKind,
    reader: StringReader,
}

impl CommandSyntaxError {
    /// Creates an error capturing the reader's current state.
    pub fn new(kind: SyntaxErrorKind, reader: &StringReader) -> Self {
        Self {
            kind,
            reader: reader.clone(),
        }
    }

    /// Creates an error with a free-form message.
    pub fn custom(message: impl Into<String>, reader: &StringReader) -> Self {
        Self::new(SyntaxErrorKind::Custom(message.into()), reader)
    }

    pub fn kind(&self) -> &SyntaxErrorKind {
        &self.kind
    }

    /// The human-readable message without position information.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Reader state at the time of failure.
    pub fn reader(&self) -> &StringReader {
        &self.reader
    }

    /// Cursor position at the time of failure.
    pub fn cursor(&self) -> usize {
        self.reader.cursor()
    }

    /// The full input that was being read.
    pub fn input(&self) -> &str {
        self.reader.string()
    }

    /// Renders the tail of the consumed input followed by a `<--[HERE]`
    /// marker, e.g. `...t foo bar<--[HERE]`.
    pub fn context(&self) -> String {
        let consumed = self.reader.consumed();
        let tail_start = consumed
            .char_indices()
            .rev()
            .nth(CONTEXT_AMOUNT - 1)
            .map(|(index, _)| index)
            .unwrap_or(0);

        let mut out = String::with_capacity(consumed.len() - tail_start + 12);
        if tail_start > 0 {
            out.push_str("...");
        }
        out.push_str(&consumed[tail_start..]);
        out.push_str("<--[HERE]");
        out
    }
}
