//! Cursor-based reader over command input.
//!
//! [`StringReader`] wraps an immutable string and a mutable cursor. Typed
//! reads are all-or-nothing: on success the cursor sits at the end of the
//! token, on failure it is back at the token start, so several argument
//! parsers can be tried against the same position without manual
//! backtracking.
//!
//! Cursor positions are byte offsets into the UTF-8 input. Every character
//! the typed reads recognise is ASCII, so token boundaries are always
//! character boundaries.
//!
//! # Example
//!
//! ```
//! use marshal_core::StringReader;
//!
//! let mut reader = StringReader::new("tp -12 64.5 true");
//! assert_eq!(reader.read_string(), "tp");
//! reader.skip_whitespace();
//! assert_eq!(reader.read_int().unwrap(), -12);
//! reader.skip_whitespace();
//! assert_eq!(reader.read_double().unwrap(), 64.5);
//! reader.skip_whitespace();
//! assert!(reader.read_boolean().unwrap());
//! assert!(!reader.can_read());
//! ```

use std::str::FromStr;
use std::sync::Arc;

use crate::{CommandSyntaxError, SyntaxErrorKind};

/// Immutable input with a movable cursor.
///
/// Cloning shares the underlying string and copies the cursor; the clones
/// move independently afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringReader {
    string: Arc<str>,
    cursor: usize,
}

impl StringReader {
    /// Creates a reader positioned at the start of `string`.
    pub fn new(string: impl Into<Arc<str>>) -> Self {
        Self {
            string: string.into(),
            cursor: 0,
        }
    }

    /// The complete input.
    pub fn string(&self) -> &str {
        &self.string
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor to `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is past the end of the input or not on a character
    /// boundary.
    pub fn set_cursor(&mut self, cursor: usize) {
        assert!(
            self.string.is_char_boundary(cursor),
            "cursor out of range: {cursor} (length {})",
            self.string.len()
        );
        self.cursor = cursor;
    }

    pub fn remaining_length(&self) -> usize {
        self.string.len() - self.cursor
    }

    pub fn total_length(&self) -> usize {
        self.string.len()
    }

    /// Returns `true` if at least one more character can be read.
    pub fn can_read(&self) -> bool {
        self.can_read_n(1)
    }

    /// Returns `true` if `length` more bytes are available.
    pub fn can_read_n(&self, length: usize) -> bool {
        self.cursor + length <= self.string.len()
    }

    /// The character at the cursor.
    ///
    /// # Panics
    ///
    /// Panics at end of input; guard with [`can_read`](Self::can_read).
    pub fn peek(&self) -> char {
        self.peek_at(0)
    }

    /// The character `offset` bytes past the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds or not a character boundary.
    pub fn peek_at(&self, offset: usize) -> char {
        let index = self.cursor + offset;
        match self.string.get(index..).and_then(|rest| rest.chars().next()) {
            Some(c) => c,
            None => panic!(
                "peek out of range: {index} (length {})",
                self.string.len()
            ),
        }
    }

    /// Returns the character at the cursor and advances past it.
    pub fn read(&mut self) -> char {
        let c = self.peek();
        self.cursor += c.len_utf8();
        c
    }

    /// Advances past the character at the cursor.
    pub fn skip(&mut self) {
        self.read();
    }

    /// Skips spaces, tabs, newlines and carriage returns.
    pub fn skip_whitespace(&mut self) {
        while self.can_read() && Self::is_whitespace(self.peek()) {
            self.skip();
        }
    }

    /// Reads an optionally negative 32-bit integer.
    ///
    /// # Errors
    ///
    /// [`ExpectedInt`](SyntaxErrorKind::ExpectedInt) with the cursor unchanged
    /// if no digit follows the optional sign, or
    /// [`InvalidInt`](SyntaxErrorKind::InvalidInt) with the cursor reset when
    /// the digits overflow.
    pub fn read_int(&mut self) -> Result<i32, CommandSyntaxError> {
        self.read_number(
            Self::skip_digits,
            SyntaxErrorKind::ExpectedInt,
            SyntaxErrorKind::InvalidInt,
        )
    }

    /// Reads an optionally negative 64-bit integer.
    ///
    /// # Errors
    ///
    /// Same rules as [`read_int`](Self::read_int) with the `Long` error kinds.
    pub fn read_long(&mut self) -> Result<i64, CommandSyntaxError> {
        self.read_number(
            Self::skip_digits,
            SyntaxErrorKind::ExpectedLong,
            SyntaxErrorKind::InvalidLong,
        )
    }

    /// Reads a single-precision number: `-?[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]*)?`.
    ///
    /// # Errors
    ///
    /// [`ExpectedFloat`](SyntaxErrorKind::ExpectedFloat) with the cursor
    /// unchanged if no leading digit is present, or
    /// [`InvalidFloat`](SyntaxErrorKind::InvalidFloat) with the cursor reset
    /// when the token does not convert (e.g. a dangling exponent).
    pub fn read_float(&mut self) -> Result<f32, CommandSyntaxError> {
        self.read_number(
            Self::skip_numeric_part,
            SyntaxErrorKind::ExpectedFloat,
            SyntaxErrorKind::InvalidFloat,
        )
    }

    /// Reads a double-precision number.
    ///
    /// # Errors
    ///
    /// Same rules as [`read_float`](Self::read_float) with the `Double` error
    /// kinds.
    pub fn read_double(&mut self) -> Result<f64, CommandSyntaxError> {
        self.read_number(
            Self::skip_numeric_part,
            SyntaxErrorKind::ExpectedDouble,
            SyntaxErrorKind::InvalidDouble,
        )
    }

    /// Reads the longest run of characters allowed in an unquoted string.
    ///
    /// Never fails; returns an empty string and leaves the cursor in place
    /// when the next character is not allowed or the input is exhausted.
    pub fn read_string(&mut self) -> String {
        let start = self.cursor;
        while self.can_read() && Self::is_allowed_in_unquoted_string(self.peek()) {
            self.skip();
        }
        self.string[start..self.cursor].to_string()
    }

    /// Reads `true` or `false`.
    ///
    /// # Errors
    ///
    /// [`ExpectedBool`](SyntaxErrorKind::ExpectedBool) with the cursor reset
    /// to where the read started.
    pub fn read_boolean(&mut self) -> Result<bool, CommandSyntaxError> {
        let start = self.cursor;
        match self.read_string().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => {
                self.cursor = start;
                Err(CommandSyntaxError::new(SyntaxErrorKind::ExpectedBool, self))
            }
        }
    }

    /// The input before the cursor.
    pub fn consumed(&self) -> &str {
        &self.string[..self.cursor]
    }

    /// The input from the cursor onwards.
    pub fn remaining(&self) -> &str {
        &self.string[self.cursor..]
    }

    /// Returns `true` for `0-9`, `A-Z`, `a-z`, `_`, `-`, `.` and `+`.
    pub fn is_allowed_in_unquoted_string(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
    }

    /// Returns `true` for space, tab, newline and carriage return.
    pub fn is_whitespace(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\r')
    }

    fn read_number<T: FromStr>(
        &mut self,
        skip_body: fn(&mut Self),
        expected: SyntaxErrorKind,
        invalid: SyntaxErrorKind,
    ) -> Result<T, CommandSyntaxError> {
        let start = self.cursor;
        self.skip_optional_sign();

        if !self.can_read() || !self.peek().is_ascii_digit() {
            self.cursor = start;
            return Err(CommandSyntaxError::new(expected, self));
        }

        skip_body(self);
        match self.string[start..self.cursor].parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                self.cursor = start;
                Err(CommandSyntaxError::new(invalid, self))
            }
        }
    }

    fn skip_optional_sign(&mut self) {
        if self.can_read() && self.peek() == '-' {
            self.skip();
        }
    }

    fn skip_digits(&mut self) {
        while self.can_read() && self.peek().is_ascii_digit() {
            self.skip();
        }
    }

    fn skip_numeric_part(&mut self) {
        self.skip_digits();

        if self.can_read() && self.peek() == '.' {
            self.skip();
            self.skip_digits();
        }

        if self.can_read() && matches!(self.peek(), 'e' | 'E') {
            self.skip();
            if self.can_read() && matches!(self.peek(), '+' | '-') {
                self.skip();
            }
            self.skip_digits();
        }
    }
}

impl From<&str> for StringReader {
    fn from(string: &str) -> Self {
        Self::new(string)
    }
}

impl From<String> for StringReader {
    fn from(string: String) -> Self {
        Self::new(string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reader_starts_at_zero() {
        let reader = StringReader::new("test");
        assert_eq!(reader.string(), "test");
        assert_eq!(reader.cursor(), 0);
        assert_eq!(reader.total_length(), 4);
        assert_eq!(reader.remaining_length(), 4);
    }

    #[test]
    fn test_clone_copies_cursor_and_moves_independently() {
        let mut original = StringReader::new("test");
        original.set_cursor(2);

        let mut copy = original.clone();
        assert_eq!(copy.string(), "test");
        assert_eq!(copy.cursor(), 2);

        copy.skip();
        assert_eq!(copy.cursor(), 3);
        assert_eq!(original.cursor(), 2);
    }

    #[test]
    fn test_set_cursor_accepts_end_of_input() {
        let mut reader = StringReader::new("test");
        reader.set_cursor(4);
        assert_eq!(reader.cursor(), 4);
        assert_eq!(reader.remaining_length(), 0);
        assert!(!reader.can_read());
        reader.set_cursor(0);
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    #[should_panic(expected = "cursor out of range")]
    fn test_set_cursor_past_end_panics() {
        let mut reader = StringReader::new("test");
        reader.set_cursor(5);
    }

    #[test]
    fn test_can_read_n() {
        let mut reader = StringReader::new("test");
        reader.set_cursor(2);
        assert!(reader.can_read_n(2));
        assert!(!reader.can_read_n(3));
        assert!(reader.can_read());
    }

    #[test]
    fn test_peek_and_read() {
        let mut reader = StringReader::new("test");
        assert_eq!(reader.peek(), 't');
        assert_eq!(reader.peek_at(2), 's');
        assert_eq!(reader.cursor(), 0);

        assert_eq!(reader.read(), 't');
        assert_eq!(reader.read(), 'e');
        assert_eq!(reader.cursor(), 2);
        assert_eq!(reader.peek(), 's');
    }

    #[test]
    #[should_panic(expected = "peek out of range")]
    fn test_peek_at_end_panics() {
        let mut reader = StringReader::new("ab");
        reader.set_cursor(2);
        reader.peek();
    }

    #[test]
    fn test_skip_whitespace() {
        let mut reader = StringReader::new("  \t\n\rtest");
        reader.skip_whitespace();
        assert_eq!(reader.cursor(), 5);
        assert_eq!(reader.peek(), 't');

        let mut none = StringReader::new("test");
        none.skip_whitespace();
        assert_eq!(none.cursor(), 0);

        let mut only = StringReader::new("   ");
        only.skip_whitespace();
        assert_eq!(only.cursor(), 3);
    }

    #[test]
    fn test_read_int_values() {
        let mut reader = StringReader::new("123");
        assert_eq!(reader.read_int().unwrap(), 123);
        assert_eq!(reader.cursor(), 3);

        let mut reader = StringReader::new("-456");
        assert_eq!(reader.read_int().unwrap(), -456);
        assert_eq!(reader.cursor(), 4);

        let mut reader = StringReader::new("0");
        assert_eq!(reader.read_int().unwrap(), 0);
        assert_eq!(reader.cursor(), 1);
    }

    #[test]
    fn test_read_int_stops_at_non_digit() {
        let mut reader = StringReader::new("123abc");
        assert_eq!(reader.read_int().unwrap(), 123);
        assert_eq!(reader.cursor(), 3);
        assert_eq!(reader.peek(), 'a');
    }

    #[test]
    fn test_read_int_without_digits_leaves_cursor() {
        for input in ["", "abc", "-", "-x", "+5"] {
            let mut reader = StringReader::new(input);
            let err = reader.read_int().unwrap_err();
            assert_eq!(err.kind(), &SyntaxErrorKind::ExpectedInt, "input {input:?}");
            assert_eq!(reader.cursor(), 0, "input {input:?}");
        }
    }

    #[test]
    fn test_read_int_overflow_resets_cursor() {
        let mut reader = StringReader::new("99999999999999999999");
        let err = reader.read_int().unwrap_err();
        assert_eq!(err.kind(), &SyntaxErrorKind::InvalidInt);
        assert_eq!(err.cursor(), 0);
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    fn test_read_int_bounds() {
        let mut reader = StringReader::new("2147483647 -2147483648 2147483648");
        assert_eq!(reader.read_int().unwrap(), i32::MAX);
        reader.skip();
        assert_eq!(reader.read_int().unwrap(), i32::MIN);
        reader.skip();
        let start = reader.cursor();
        assert!(reader.read_int().is_err());
        assert_eq!(reader.cursor(), start);
    }

    #[test]
    fn test_read_int_from_middle_restores_start() {
        let mut reader = StringReader::new("x 99999999999");
        reader.set_cursor(2);
        assert!(reader.read_int().is_err());
        assert_eq!(reader.cursor(), 2);
    }

    #[test]
    fn test_read_long() {
        let mut reader = StringReader::new("123456789");
        assert_eq!(reader.read_long().unwrap(), 123_456_789);
        assert_eq!(reader.cursor(), 9);

        let mut reader = StringReader::new("-987654321");
        assert_eq!(reader.read_long().unwrap(), -987_654_321);
        assert_eq!(reader.cursor(), 10);

        let mut reader = StringReader::new("");
        assert_eq!(
            reader.read_long().unwrap_err().kind(),
            &SyntaxErrorKind::ExpectedLong
        );

        let mut reader = StringReader::new("99999999999999999999999999");
        assert_eq!(
            reader.read_long().unwrap_err().kind(),
            &SyntaxErrorKind::InvalidLong
        );
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    fn test_read_float_forms() {
        let cases: [(&str, f32, usize); 7] = [
            ("123.45", 123.45, 6),
            ("-67.89", -67.89, 6),
            ("123", 123.0, 3),
            ("1.5e10", 1.5e10, 6),
            ("2.5E-3", 2.5e-3, 6),
            ("1e+5", 1e5, 4),
            ("123.", 123.0, 4),
        ];
        for (input, expected, cursor) in cases {
            let mut reader = StringReader::new(input);
            assert_eq!(reader.read_float().unwrap(), expected, "input {input:?}");
            assert_eq!(reader.cursor(), cursor, "input {input:?}");
        }
    }

    #[test]
    fn test_read_float_stops_after_second_dot() {
        let mut reader = StringReader::new("1.2.3");
        assert_eq!(reader.read_float().unwrap(), 1.2);
        assert_eq!(reader.cursor(), 3);
        assert_eq!(reader.remaining(), ".3");
    }

    #[test]
    fn test_read_float_failures() {
        for input in ["", "abc", "-", ".5"] {
            let mut reader = StringReader::new(input);
            let err = reader.read_float().unwrap_err();
            assert_eq!(err.kind(), &SyntaxErrorKind::ExpectedFloat, "input {input:?}");
            assert_eq!(reader.cursor(), 0);
        }

        for input in ["1e", "1e+", "-3E-"] {
            let mut reader = StringReader::new(input);
            let err = reader.read_float().unwrap_err();
            assert_eq!(err.kind(), &SyntaxErrorKind::InvalidFloat, "input {input:?}");
            assert_eq!(reader.cursor(), 0);
        }
    }

    #[test]
    fn test_read_double() {
        let cases: [(&str, f64, usize); 6] = [
            ("123.456789", 123.456789, 10),
            ("-987.654321", -987.654321, 11),
            ("123", 123.0, 3),
            ("1.5e10", 1.5e10, 6),
            ("2.5E-3", 2.5e-3, 6),
            ("1e+5", 1e5, 4),
        ];
        for (input, expected, cursor) in cases {
            let mut reader = StringReader::new(input);
            assert_eq!(reader.read_double().unwrap(), expected, "input {input:?}");
            assert_eq!(reader.cursor(), cursor, "input {input:?}");
        }

        let mut reader = StringReader::new("xyz");
        assert_eq!(
            reader.read_double().unwrap_err().kind(),
            &SyntaxErrorKind::ExpectedDouble
        );

        let mut reader = StringReader::new("1e");
        assert_eq!(
            reader.read_double().unwrap_err().kind(),
            &SyntaxErrorKind::InvalidDouble
        );
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    fn test_read_string_allowed_characters() {
        for input in ["test", "test123", "test_name", "test-name", "test.name", "test+name"] {
            let mut reader = StringReader::new(input);
            assert_eq!(reader.read_string(), input);
            assert_eq!(reader.cursor(), input.len());
        }
    }

    #[test]
    fn test_read_string_stops_at_disallowed() {
        let mut reader = StringReader::new("test name");
        assert_eq!(reader.read_string(), "test");
        assert_eq!(reader.cursor(), 4);

        let mut reader = StringReader::new("test@name");
        assert_eq!(reader.read_string(), "test");
        assert_eq!(reader.cursor(), 4);
    }

    #[test]
    fn test_read_string_empty_cases() {
        let mut reader = StringReader::new("");
        assert_eq!(reader.read_string(), "");
        assert_eq!(reader.cursor(), 0);

        let mut reader = StringReader::new("@test");
        assert_eq!(reader.read_string(), "");
        assert_eq!(reader.cursor(), 0);
    }

    #[test]
    fn test_read_boolean() {
        let mut reader = StringReader::new("true");
        assert!(reader.read_boolean().unwrap());
        assert_eq!(reader.cursor(), 4);

        let mut reader = StringReader::new("false");
        assert!(!reader.read_boolean().unwrap());
        assert_eq!(reader.cursor(), 5);
    }

    #[test]
    fn test_read_boolean_failure_resets_cursor() {
        for input in ["", "yes", "invalid", "truex", "TRUE"] {
            let mut reader = StringReader::new(input);
            let err = reader.read_boolean().unwrap_err();
            assert_eq!(err.kind(), &SyntaxErrorKind::ExpectedBool);
            assert_eq!(reader.cursor(), 0, "input {input:?}");
        }
    }

    #[test]
    fn test_consumed_and_remaining_round_trip() {
        let input = "give @p 64";
        let mut reader = StringReader::new(input);
        for cursor in 0..=input.len() {
            reader.set_cursor(cursor);
            assert_eq!(format!("{}{}", reader.consumed(), reader.remaining()), input);
        }

        reader.set_cursor(2);
        assert_eq!(reader.consumed(), "gi");
        assert_eq!(reader.remaining(), "ve @p 64");
    }

    #[test]
    fn test_non_ascii_input_is_skipped_by_character() {
        let mut reader = StringReader::new("é1");
        assert_eq!(reader.read(), 'é');
        assert_eq!(reader.cursor(), 2);
        assert_eq!(reader.read_int().unwrap(), 1);
    }

    #[test]
    fn test_unquoted_character_classes() {
        for c in ['0', '5', '9', 'A', 'M', 'Z', 'a', 'm', 'z', '_', '-', '.', '+'] {
            assert!(StringReader::is_allowed_in_unquoted_string(c), "{c:?}");
        }
        for c in [' ', '@', '!', '/', 'é'] {
            assert!(!StringReader::is_allowed_in_unquoted_string(c), "{c:?}");
        }
    }

    #[test]
    fn test_whitespace_character_class() {
        for c in [' ', '\t', '\n', '\r'] {
            assert!(StringReader::is_whitespace(c));
        }
        for c in ['a', '1', '_'] {
            assert!(!StringReader::is_whitespace(c));
        }
    }
}
