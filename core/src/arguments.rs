//! Built-in argument parsers.
//!
//! Each parser wraps one [`StringReader`] read and keeps its all-or-nothing
//! cursor behavior: numeric parsers that read a value outside their bounds
//! put the cursor back at the token start before failing.
//!
//! [`ArgumentType`] describes a built-in parser as data, so trees can be
//! declared in configuration files.
//!
//! # Examples
//!
//! ```
//! use marshal_core::{ArgumentParser, StringReader, SyntaxErrorKind, arguments};
//!
//! let stack = arguments::integer_range(1, 64);
//!
//! let mut reader = StringReader::new("16");
//! assert_eq!(stack.parse(&mut reader).unwrap(), 16);
//!
//! let mut reader = StringReader::new("65");
//! let err = stack.parse(&mut reader).unwrap_err();
//! assert!(matches!(err.kind(), SyntaxErrorKind::TooHigh { .. }));
//! assert_eq!(reader.cursor(), 0);
//! ```

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{ArgumentParser, CommandSyntaxError, StringReader, SyntaxErrorKind};

/// Numeric types readable by [`StringReader`].
pub trait Number: Copy + PartialOrd + Display + Send + Sync + 'static {
    /// Smallest accepted value when no lower bound is given.
    const LOWEST: Self;
    /// Largest accepted value when no upper bound is given.
    const HIGHEST: Self;

    fn read(reader: &mut StringReader) -> Result<Self, CommandSyntaxError>;
}

impl Number for i32 {
    const LOWEST: Self = i32::MIN;
    const HIGHEST: Self = i32::MAX;

    fn read(reader: &mut StringReader) -> Result<Self, CommandSyntaxError> {
        reader.read_int()
    }
}

impl Number for i64 {
    const LOWEST: Self = i64::MIN;
    const HIGHEST: Self = i64::MAX;

    fn read(reader: &mut StringReader) -> Result<Self, CommandSyntaxError> {
        reader.read_long()
    }
}

impl Number for f32 {
    const LOWEST: Self = f32::MIN;
    const HIGHEST: Self = f32::MAX;

    fn read(reader: &mut StringReader) -> Result<Self, CommandSyntaxError> {
        reader.read_float()
    }
}

impl Number for f64 {
    const LOWEST: Self = f64::MIN;
    const HIGHEST: Self = f64::MAX;

    fn read(reader: &mut StringReader) -> Result<Self, CommandSyntaxError> {
        reader.read_double()
    }
}

/// Reads a number and checks it against inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberArgument<N> {
    min: N,
    max: N,
}

pub type IntegerArgument = NumberArgument<i32>;
pub type LongArgument = NumberArgument<i64>;
pub type FloatArgument = NumberArgument<f32>;
pub type DoubleArgument = NumberArgument<f64>;

impl<N: Number> NumberArgument<N> {
    pub fn new(min: N, max: N) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> N {
        self.min
    }

    pub fn max(&self) -> N {
        self.max
    }
}

impl<N: Number> Default for NumberArgument<N> {
    fn default() -> Self {
        Self::new(N::LOWEST, N::HIGHEST)
    }
}

impl<N: Number> ArgumentParser<N> for NumberArgument<N> {
    fn parse(&self, reader: &mut StringReader) -> Result<N, CommandSyntaxError> {
        let start = reader.cursor();
        let value = N::read(reader)?;

        let kind = if value < self.min {
            SyntaxErrorKind::TooLow {
                found: value.to_string(),
                min: self.min.to_string(),
            }
        } else if value > self.max {
            SyntaxErrorKind::TooHigh {
                found: value.to_string(),
                max: self.max.to_string(),
            }
        } else {
            return Ok(value);
        };

        reader.set_cursor(start);
        Err(CommandSyntaxError::new(kind, reader))
    }
}

/// Reads `true` or `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolArgument;

impl ArgumentParser<bool> for BoolArgument {
    fn parse(&self, reader: &mut StringReader) -> Result<bool, CommandSyntaxError> {
        reader.read_boolean()
    }
}

/// Reads a non-empty unquoted word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordArgument;

impl ArgumentParser<String> for WordArgument {
    fn parse(&self, reader: &mut StringReader) -> Result<String, CommandSyntaxError> {
        let word = reader.read_string();
        if word.is_empty() {
            return Err(CommandSyntaxError::new(SyntaxErrorKind::ExpectedWord, reader));
        }
        Ok(word)
    }
}

pub fn integer() -> IntegerArgument {
    IntegerArgument::default()
}

pub fn integer_range(min: i32, max: i32) -> IntegerArgument {
    IntegerArgument::new(min, max)
}

pub fn long() -> LongArgument {
    LongArgument::default()
}

pub fn float() -> FloatArgument {
    FloatArgument::default()
}

pub fn double() -> DoubleArgument {
    DoubleArgument::default()
}

pub fn boolean() -> BoolArgument {
    BoolArgument
}

pub fn word() -> WordArgument {
    WordArgument
}

/// A built-in parser described as data.
///
/// Serialized with a `kind` tag, e.g. `{ kind: integer, min: 1, max: 64 }`.
///
/// # Examples
///
/// ```
/// use marshal_core::{ArgumentParser, ArgumentType, ArgumentValue, StringReader};
///
/// let ty: ArgumentType = serde_json::from_str(r#"{"kind":"integer","min":1}"#).unwrap();
/// let mut reader = StringReader::new("3");
/// assert_eq!(ty.parse(&mut reader).unwrap(), ArgumentValue::Integer(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgumentType {
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i32>,
    },
    Long {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f32>,
    },
    Double {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Bool,
    Word,
}

impl ArgumentType {
    /// Name of the kind tag (`integer`, `word`, ...).
    pub fn kind_name(&self) -> &'static str {
        match self {
            ArgumentType::Integer { .. } => "integer",
            ArgumentType::Long { .. } => "long",
            ArgumentType::Float { .. } => "float",
            ArgumentType::Double { .. } => "double",
            ArgumentType::Bool => "bool",
            ArgumentType::Word => "word",
        }
    }
}

fn bounded<N: Number>(min: Option<N>, max: Option<N>) -> NumberArgument<N> {
    NumberArgument::new(min.unwrap_or(N::LOWEST), max.unwrap_or(N::HIGHEST))
}

/// A value read by an [`ArgumentType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Word(String),
}

impl ArgumentParser<ArgumentValue> for ArgumentType {
    fn parse(&self, reader: &mut StringReader) -> Result<ArgumentValue, CommandSyntaxError> {
        Ok(match *self {
            ArgumentType::Integer { min, max } => {
                ArgumentValue::Integer(bounded(min, max).parse(reader)?)
            }
            ArgumentType::Long { min, max } => ArgumentValue::Long(bounded(min, max).parse(reader)?),
            ArgumentType::Float { min, max } => {
                ArgumentValue::Float(bounded(min, max).parse(reader)?)
            }
            ArgumentType::Double { min, max } => {
                ArgumentValue::Double(bounded(min, max).parse(reader)?)
            }
            ArgumentType::Bool => ArgumentValue::Bool(BoolArgument.parse(reader)?),
            ArgumentType::Word => ArgumentValue::Word(WordArgument.parse(reader)?),
        })
    }
}
