//! Argument parser contract and its type-erased form stored in nodes.
//!
//! Builders keep the typed [`ArgumentParser<T>`]; once built, an argument
//! node only knows an [`ErasedParser`], because siblings in the same tree can
//! parse values of different types. The erased parser yields a
//! [`ParsedArgument`] that is downcast back to the concrete type.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::{CommandSyntaxError, StringReader};

/// Reads a typed value from the reader's current position.
///
/// Implementations should be all-or-nothing: on failure the cursor must be
/// back where the parse started.
///
/// Any `Fn(&mut StringReader) -> Result<T, CommandSyntaxError>` closure is a
/// parser.
///
/// # Examples
///
/// ```
/// use marshal_core::{ArgumentParser, StringReader};
///
/// let even = |reader: &mut StringReader| {
///     let start = reader.cursor();
///     let value = reader.read_int()?;
///     if value % 2 != 0 {
///         reader.set_cursor(start);
///         return Err(marshal_core::CommandSyntaxError::custom("Expected even number", reader));
///     }
///     Ok(value)
/// };
///
/// let mut reader = StringReader::new("42");
/// assert_eq!(even.parse(&mut reader).unwrap(), 42);
///
/// let mut reader = StringReader::new("7");
/// assert!(even.parse(&mut reader).is_err());
/// assert_eq!(reader.cursor(), 0);
/// ```
pub trait ArgumentParser<T>: Send + Sync {
    fn parse(&self, reader: &mut StringReader) -> Result<T, CommandSyntaxError>;
}

impl<T, F> ArgumentParser<T> for F
where
    F: Fn(&mut StringReader) -> Result<T, CommandSyntaxError> + Send + Sync,
{
    fn parse(&self, reader: &mut StringReader) -> Result<T, CommandSyntaxError> {
        self(reader)
    }
}

/// A value produced by an [`ErasedParser`].
pub struct ParsedArgument {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl ParsedArgument {
    /// Returns the value if it is a `T`.
    pub fn downcast<T: 'static>(self) -> Option<T> {
        self.value.downcast::<T>().ok().map(|value| *value)
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Fully qualified name of the parsed value's type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for ParsedArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedArgument")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

trait DynParser: Send + Sync {
    fn parse_dyn(&self, reader: &mut StringReader) -> Result<ParsedArgument, CommandSyntaxError>;
}

struct Typed<T> {
    parser: Arc<dyn ArgumentParser<T>>,
}

impl<T: 'static> DynParser for Typed<T> {
    fn parse_dyn(&self, reader: &mut StringReader) -> Result<ParsedArgument, CommandSyntaxError> {
        let value = self.parser.parse(reader)?;
        Ok(ParsedArgument {
            value: Box::new(value),
            type_name: std::any::type_name::<T>(),
        })
    }
}

/// Type-erased parser held by argument nodes. Cheap to clone.
///
/// # Examples
///
/// ```
/// use marshal_core::{ErasedParser, StringReader, arguments};
///
/// let parser = ErasedParser::new(arguments::integer());
/// assert_eq!(parser.value_type(), "i32");
///
/// let mut reader = StringReader::new("42");
/// let parsed = parser.parse(&mut reader).unwrap();
/// assert_eq!(parsed.downcast::<i32>(), Some(42));
/// ```
#[derive(Clone)]
pub struct ErasedParser {
    inner: Arc<dyn DynParser>,
    type_name: &'static str,
}

impl ErasedParser {
    pub fn new<T, P>(parser: P) -> Self
    where
        T: 'static,
        P: ArgumentParser<T> + 'static,
    {
        Self::from_shared::<T>(Arc::new(parser))
    }

    pub(crate) fn from_shared<T: 'static>(parser: Arc<dyn ArgumentParser<T>>) -> Self {
        Self {
            inner: Arc::new(Typed { parser }),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Runs the parser against the reader's current position.
    ///
    /// # Errors
    ///
    /// Whatever syntax error the underlying parser reports.
    pub fn parse(&self, reader: &mut StringReader) -> Result<ParsedArgument, CommandSyntaxError> {
        self.inner.parse_dyn(reader)
    }

    /// Short name of the produced value type (`i32`, `String`, ...).
    pub fn value_type(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    /// Fully qualified name of the produced value type.
    pub fn value_type_path(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for ErasedParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedParser")
            .field("value_type", &self.type_name)
            .finish()
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}
