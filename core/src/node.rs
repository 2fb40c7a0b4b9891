//! Command tree nodes.
//!
//! A [`CommandNode`] is either a literal keyword or a typed argument. Both
//! variants share a name, a child map, an optional requirement and an
//! optional executor; they differ in their payload ([`NodeKind`]) and in how
//! [`add_child`](CommandNode::add_child) resolves a name collision:
//!
//! - a **literal** parent replaces the existing child outright, discarding
//!   its subtree;
//! - an **argument** parent merges: the incoming child's own children are
//!   re-added to the existing child, and the incoming child's executor and
//!   requirement are dropped.
//!
//! Nodes are produced by the builders in [`crate::commands`].

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::{CommandContext, CommandExecutor, CommandSyntaxError, ErasedParser};

/// Predicate deciding whether a source may use a node.
pub type Requirement<S> = Arc<dyn Fn(&S) -> bool + Send + Sync>;

/// Shared handle to a node's executor.
pub type Executor<S> = Arc<dyn CommandExecutor<S>>;

/// Variant payload of a [`CommandNode`].
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Matches a fixed keyword.
    Literal { case_sensitive: bool },
    /// Matches a value read by `parser`.
    Argument { parser: ErasedParser },
}

/// One point in the command grammar and its permitted continuations.
///
/// Equality and hashing only look at the variant and the name: two literal
/// nodes called `give` are equal whatever their children or executors.
pub struct CommandNode<S> {
    name: String,
    kind: NodeKind,
    children: HashMap<String, CommandNode<S>>,
    requirement: Option<Requirement<S>>,
    executor: Option<Executor<S>>,
}

impl<S> CommandNode<S> {
    pub(crate) fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            children: HashMap::new(),
            requirement: None,
            executor: None,
        }
    }

    pub(crate) fn set_requirement(&mut self, requirement: Option<Requirement<S>>) {
        self.requirement = requirement;
    }

    pub(crate) fn set_executor(&mut self, executor: Option<Executor<S>>) {
        self.executor = executor;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal { .. })
    }

    pub fn is_argument(&self) -> bool {
        matches!(self.kind, NodeKind::Argument { .. })
    }

    /// Case sensitivity of a literal node; `None` for arguments.
    pub fn case_sensitive(&self) -> Option<bool> {
        match self.kind {
            NodeKind::Literal { case_sensitive } => Some(case_sensitive),
            NodeKind::Argument { .. } => None,
        }
    }

    /// The value parser of an argument node; `None` for literals.
    pub fn parser(&self) -> Option<&ErasedParser> {
        match &self.kind {
            NodeKind::Argument { parser } => Some(parser),
            NodeKind::Literal { .. } => None,
        }
    }

    /// Returns `true` if `token` spells this literal, honoring its case
    /// sensitivity. Always `false` for argument nodes.
    pub fn accepts_literal(&self, token: &str) -> bool {
        match self.kind {
            NodeKind::Literal {
                case_sensitive: true,
            } => self.name == token,
            NodeKind::Literal {
                case_sensitive: false,
            } => self.name.eq_ignore_ascii_case(token),
            NodeKind::Argument { .. } => false,
        }
    }

    /// Children in unspecified order.
    pub fn children(&self) -> impl Iterator<Item = &CommandNode<S>> {
        self.children.values()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode<S>> {
        self.children.get(name)
    }

    /// Mutable access to a child, e.g. to grow a subtree after building.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut CommandNode<S>> {
        self.children.get_mut(name)
    }

    /// Adds `child`, resolving a name collision by this node's variant rule
    /// (see the [module docs](self)).
    pub fn add_child(&mut self, child: CommandNode<S>) {
        match self.kind {
            NodeKind::Literal { .. } => {
                let name = child.name.clone();
                if self.children.insert(name, child).is_some() {
                    debug!(parent = %self.name, "Replaced existing child of literal node");
                } else {
                    trace!(parent = %self.name, "Inserted child");
                }
            }
            NodeKind::Argument { .. } => match self.children.get_mut(&child.name) {
                Some(existing) => {
                    debug!(
                        parent = %self.name,
                        child = %child.name,
                        grandchildren = child.children.len(),
                        "Merging into existing child of argument node"
                    );
                    for grandchild in child.children.into_values() {
                        existing.add_child(grandchild);
                    }
                }
                None => {
                    trace!(parent = %self.name, child = %child.name, "Inserted child");
                    self.children.insert(child.name.clone(), child);
                }
            },
        }
    }

    /// Returns `true` if no requirement is set or the requirement accepts
    /// `source`.
    pub fn can_use(&self, source: &S) -> bool {
        self.requirement
            .as_ref()
            .is_none_or(|requirement| requirement(source))
    }

    pub fn requirement(&self) -> Option<&Requirement<S>> {
        self.requirement.as_ref()
    }

    pub fn is_executable(&self) -> bool {
        self.executor.is_some()
    }

    /// Runs the bound executor.
    ///
    /// # Errors
    ///
    /// Whatever syntax error the executor reports.
    ///
    /// # Panics
    ///
    /// Panics if the node is not executable; check
    /// [`is_executable`](Self::is_executable) first.
    pub fn execute(&self, context: &CommandContext<S>) -> Result<i32, CommandSyntaxError> {
        match &self.executor {
            Some(executor) => executor.execute(context),
            None => panic!("command node `{}` is not executable", self.name),
        }
    }
}

impl<S> Clone for CommandNode<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind.clone(),
            children: self.children.clone(),
            requirement: self.requirement.clone(),
            executor: self.executor.clone(),
        }
    }
}

impl<S> fmt::Debug for CommandNode<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut children: Vec<&str> = self.children.keys().map(String::as_str).collect();
        children.sort_unstable();
        f.debug_struct("CommandNode")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("executable", &self.is_executable())
            .field("restricted", &self.requirement.is_some())
            .field("children", &children)
            .finish()
    }
}

impl<S> PartialEq for CommandNode<S> {
    fn eq(&self, other: &Self) -> bool {
        self.is_literal() == other.is_literal() && self.name == other.name
    }
}

impl<S> Eq for CommandNode<S> {}

impl<S> Hash for CommandNode<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
