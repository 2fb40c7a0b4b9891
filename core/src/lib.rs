//! Command tree model and string reader for text command interfaces.
//!
//! This crate provides the pieces a command dispatcher is built on:
//!
//! - [`StringReader`]: a cursor over the input line with all-or-nothing
//!   typed reads (`read_int`, `read_double`, `read_boolean`, ...).
//! - [`CommandSyntaxError`]: the one recoverable failure, carrying the
//!   reader state at the failure point.
//! - [`CommandNode`]: a literal or argument node owning its children, an
//!   optional requirement and an optional executor.
//! - [`LiteralBuilder`] / [`ArgumentBuilder`]: fluent staging types,
//!   created through [`commands::literal`] and [`commands::argument`].
//! - [`arguments`]: built-in bounded numeric, boolean and word parsers.
//! - [`NodeSnapshot`] and [`validate_tree`]: serializable views and
//!   structural checks of built trees.
//!
//! Walking a tree against an input line, suggestions and usage rendering
//! belong to the dispatcher, not to this crate.
//!
//! # Example
//!
//! ```
//! use marshal_core::*;
//! use marshal_core::commands::{argument, literal};
//!
//! #[derive(Debug)]
//! struct Player {
//!     op: bool,
//! }
//!
//! let tree = literal::<Player>("give")
//!     .requires(|player| player.op)
//!     .then(
//!         argument("item", arguments::word())
//!             .then(argument("count", arguments::integer_range(1, 64)).executes(|_| Ok(1))),
//!     )
//!     .build();
//!
//! assert!(tree.can_use(&Player { op: true }));
//! assert!(!tree.can_use(&Player { op: false }));
//! assert!(validate_tree(&tree).is_empty());
//!
//! let count = tree.child("item").and_then(|item| item.child("count")).unwrap();
//! let mut reader = StringReader::new("65");
//! let err = count.parser().unwrap().parse(&mut reader).unwrap_err();
//! assert_eq!(err.to_string(), "Value must not be more than 64, found 65 at position 0");
//! ```

mod builder;
mod context;
mod error;
mod executor;
mod node;
mod parser;
mod reader;
mod snapshot;
mod validate;

pub mod arguments;
pub mod commands;

pub use arguments::{ArgumentType, ArgumentValue};
pub use builder::{ArgumentBuilder, IntoCommandNode, LiteralBuilder};
pub use context::CommandContext;
pub use error::{CommandSyntaxError, SyntaxErrorKind};
pub use executor::CommandExecutor;
pub use node::{CommandNode, Executor, NodeKind, Requirement};
pub use parser::{ArgumentParser, ErasedParser, ParsedArgument};
pub use reader::StringReader;
pub use snapshot::{NodeSnapshot, SnapshotKind};
pub use validate::{TreeValidationError, validate_tree};
