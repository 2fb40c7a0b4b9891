//! Staged, fluent assembly of command nodes.
//!
//! Builders accumulate children, a requirement and an executor, then
//! [`build`](LiteralBuilder::build) consumes the builder and produces a
//! [`CommandNode`]. Children are attached with
//! [`add_child`](CommandNode::add_child) in the order they were passed to
//! `then`, so duplicate names resolve exactly as they would on a built node.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::node::{Executor, NodeKind, Requirement};
use crate::{
    ArgumentParser, CommandContext, CommandExecutor, CommandNode, CommandSyntaxError,
    ErasedParser,
};

/// Anything that can be attached as a child with `then`: a built node or a
/// builder, which is built on the spot.
pub trait IntoCommandNode<S> {
    fn into_command_node(self) -> CommandNode<S>;
}

impl<S> IntoCommandNode<S> for CommandNode<S> {
    fn into_command_node(self) -> CommandNode<S> {
        self
    }
}

/// Fields shared by both builder variants.
struct Staged<S> {
    requirement: Option<Requirement<S>>,
    executor: Option<Executor<S>>,
    children: Vec<CommandNode<S>>,
}

impl<S> Staged<S> {
    fn new() -> Self {
        Self {
            requirement: None,
            executor: None,
            children: Vec::new(),
        }
    }

    fn finish(self, mut node: CommandNode<S>) -> CommandNode<S> {
        node.set_requirement(self.requirement);
        node.set_executor(self.executor);
        for child in self.children {
            node.add_child(child);
        }
        node
    }
}

/// Builder for a literal keyword node.
///
/// # Examples
///
/// ```
/// use marshal_core::commands::literal;
///
/// let node = literal::<()>("Help")
///     .case_sensitive(false)
///     .then(literal("commands"))
///     .executes(|_| Ok(0))
///     .build();
///
/// assert_eq!(node.name(), "Help");
/// assert_eq!(node.case_sensitive(), Some(false));
/// assert!(node.child("commands").is_some());
/// ```
pub struct LiteralBuilder<S> {
    literal: String,
    case_sensitive: bool,
    staged: Staged<S>,
}

impl<S> LiteralBuilder<S> {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            case_sensitive: true,
            staged: Staged::new(),
        }
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Appends a child.
    pub fn then(mut self, child: impl IntoCommandNode<S>) -> Self {
        self.staged.children.push(child.into_command_node());
        self
    }

    /// Sets the requirement; a later call replaces an earlier one.
    pub fn requires<F>(mut self, requirement: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.staged.requirement = Some(Arc::new(requirement));
        self
    }

    /// Sets the executor closure; a later call replaces an earlier one.
    pub fn executes<F>(self, executor: F) -> Self
    where
        F: Fn(&CommandContext<S>) -> Result<i32, CommandSyntaxError> + Send + Sync + 'static,
    {
        self.executes_with(executor)
    }

    /// Sets an executor implemented as a type rather than a closure.
    pub fn executes_with<E>(mut self, executor: E) -> Self
    where
        E: CommandExecutor<S> + 'static,
    {
        self.staged.executor = Some(Arc::new(executor));
        self
    }

    /// Literals match case-sensitively unless told otherwise.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn build(self) -> CommandNode<S> {
        let node = CommandNode::new(
            self.literal,
            NodeKind::Literal {
                case_sensitive: self.case_sensitive,
            },
        );
        self.staged.finish(node)
    }
}

impl<S> IntoCommandNode<S> for LiteralBuilder<S> {
    fn into_command_node(self) -> CommandNode<S> {
        self.build()
    }
}

/// Builder for a typed argument node whose parser yields `T`.
///
/// # Examples
///
/// ```
/// use marshal_core::{StringReader, arguments, commands::argument};
///
/// let builder = argument::<(), _, _>("count", arguments::integer());
///
/// let mut reader = StringReader::new("42");
/// assert_eq!(builder.parser().parse(&mut reader).unwrap(), 42);
///
/// let node = builder.executes(|_| Ok(1)).build();
/// assert_eq!(node.parser().map(|p| p.value_type()), Some("i32"));
/// ```
pub struct ArgumentBuilder<S, T> {
    name: String,
    parser: Arc<dyn ArgumentParser<T>>,
    staged: Staged<S>,
    marker: PhantomData<fn() -> T>,
}

impl<S, T: 'static> ArgumentBuilder<S, T> {
    pub fn new<P>(name: impl Into<String>, parser: P) -> Self
    where
        P: ArgumentParser<T> + 'static,
    {
        Self {
            name: name.into(),
            parser: Arc::new(parser),
            staged: Staged::new(),
            marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The typed parser this argument will use.
    pub fn parser(&self) -> &dyn ArgumentParser<T> {
        self.parser.as_ref()
    }

    /// Appends a child.
    pub fn then(mut self, child: impl IntoCommandNode<S>) -> Self {
        self.staged.children.push(child.into_command_node());
        self
    }

    /// Sets the requirement; a later call replaces an earlier one.
    pub fn requires<F>(mut self, requirement: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.staged.requirement = Some(Arc::new(requirement));
        self
    }

    /// Sets the executor closure; a later call replaces an earlier one.
    pub fn executes<F>(self, executor: F) -> Self
    where
        F: Fn(&CommandContext<S>) -> Result<i32, CommandSyntaxError> + Send + Sync + 'static,
    {
        self.executes_with(executor)
    }

    /// Sets an executor implemented as a type rather than a closure.
    pub fn executes_with<E>(mut self, executor: E) -> Self
    where
        E: CommandExecutor<S> + 'static,
    {
        self.staged.executor = Some(Arc::new(executor));
        self
    }

    pub fn build(self) -> CommandNode<S> {
        let node = CommandNode::new(
            self.name,
            NodeKind::Argument {
                parser: ErasedParser::from_shared(self.parser),
            },
        );
        self.staged.finish(node)
    }
}

impl<S, T: 'static> IntoCommandNode<S> for ArgumentBuilder<S, T> {
    fn into_command_node(self) -> CommandNode<S> {
        self.build()
    }
}
