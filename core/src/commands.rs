//! Entry points for building command trees.
//!
//! Trees are assembled bottom-up: build the innermost subcommands first,
//! attach them with `then`, and finish each level with `build`.
//!
//! # Example
//!
//! ```
//! use marshal_core::{CommandContext, StringReader, arguments};
//! use marshal_core::commands::{argument, literal};
//!
//! let foo = literal::<()>("foo")
//!     .then(argument("bar", arguments::integer()).executes(|_| Ok(1)))
//!     .build();
//!
//! let bar = foo.child("bar").unwrap();
//! let mut reader = StringReader::new("42");
//! let value = bar.parser().unwrap().parse(&mut reader).unwrap();
//! assert_eq!(value.downcast::<i32>(), Some(42));
//! assert_eq!(reader.cursor(), 2);
//!
//! let mut reader = StringReader::new("abc");
//! assert!(bar.parser().unwrap().parse(&mut reader).is_err());
//! assert_eq!(reader.cursor(), 0);
//!
//! assert_eq!(bar.execute(&CommandContext::new(())).unwrap(), 1);
//! ```

use crate::{ArgumentBuilder, ArgumentParser, LiteralBuilder};

/// Starts a literal keyword node.
pub fn literal<S>(name: impl Into<String>) -> LiteralBuilder<S> {
    LiteralBuilder::new(name)
}

/// Starts an argument node named `name` whose values are read by `parser`.
pub fn argument<S, T, P>(name: impl Into<String>, parser: P) -> ArgumentBuilder<S, T>
where
    T: 'static,
    P: ArgumentParser<T> + 'static,
{
    ArgumentBuilder::new(name, parser)
}
