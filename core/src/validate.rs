//! Structural validation of command trees.
//!
//! Catches trees that build fine but cannot work as intended: nodes with
//! empty names, literal keywords the unquoted reader can never produce, and
//! branches that end without an executor.
//!
//! # Examples
//!
//! ```
//! use marshal_core::{TreeValidationError, validate_tree};
//! use marshal_core::commands::literal;
//!
//! let ok = literal::<()>("ping").executes(|_| Ok(0)).build();
//! assert!(validate_tree(&ok).is_empty());
//!
//! let dead_end = literal::<()>("config").then(literal("reload")).build();
//! assert_eq!(
//!     validate_tree(&dead_end),
//!     vec![TreeValidationError::DeadEnd("config reload".into())]
//! );
//! ```

use thiserror::Error;

use crate::{CommandNode, StringReader};

/// Tree validation errors.
///
/// Paths are space-joined node names from the validated root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeValidationError {
    /// A node has an empty or whitespace-only name.
    #[error("node name cannot be empty (under: {0})")]
    EmptyName(String),
    /// A literal contains characters outside the unquoted-string set, so no
    /// input token can ever spell it.
    #[error("literal cannot be read as an unquoted word: {0}")]
    UnreadableLiteral(String),
    /// A leaf node has no executor, so its path can never complete.
    #[error("non-executable leaf at path: {0}")]
    DeadEnd(String),
}

/// Validates `root` and its subtree, stopping at the first problem.
///
/// Children are visited in name order, so the reported error is
/// deterministic.
pub fn validate_tree<S>(root: &CommandNode<S>) -> Vec<TreeValidationError> {
    let mut errors = Vec::new();
    let mut path = Vec::new();
    if let Err(err) = validate_node(root, &mut path) {
        errors.push(err);
    }
    errors
}

fn validate_node<'a, S>(
    node: &'a CommandNode<S>,
    path: &mut Vec<&'a str>,
) -> Result<(), TreeValidationError> {
    let name = node.name();
    if name.trim().is_empty() {
        let parent = if path.is_empty() {
            "<root>".to_string()
        } else {
            path.join(" ")
        };
        return Err(TreeValidationError::EmptyName(parent));
    }

    path.push(name);

    if node.is_literal() && !name.chars().all(StringReader::is_allowed_in_unquoted_string) {
        return Err(TreeValidationError::UnreadableLiteral(path.join(" ")));
    }

    if node.child_count() == 0 && !node.is_executable() {
        return Err(TreeValidationError::DeadEnd(path.join(" ")));
    }

    let mut children: Vec<&CommandNode<S>> = node.children().collect();
    children.sort_by(|a, b| a.name().cmp(b.name()));
    for child in children {
        validate_node(child, path)?;
    }

    path.pop();
    Ok(())
}
