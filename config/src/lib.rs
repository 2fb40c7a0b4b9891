//! Declarative YAML/JSON definitions for marshal command trees.
//!
//! A [`TreeConfig`] describes literal and argument nodes as data. Compiling
//! it with [`TreeConfig::build`] produces validated [`CommandNode`] roots
//! whose `requires:` entries are checked against a [`PermissionSource`].
//!
//! # Quick start
//!
//! ```no_run
//! use marshal_config::{PermissionSet, TreeConfig};
//!
//! let config = TreeConfig::load("commands.yaml").unwrap();
//! let roots = config.build::<PermissionSet>().unwrap();
//! for root in &roots {
//!     println!("{} has {} children", root.name(), root.child_count());
//! }
//! ```
//!
//! [`CommandNode`]: marshal_core::CommandNode

mod definition;
mod error;
mod permissions;

pub use definition::{DefinitionFormat, NodeDefinition, TreeConfig};
pub use error::{ConfigError, Result};
pub use permissions::{PermissionSet, PermissionSource};
