//! Callback contract for executable command nodes.

use crate::{CommandContext, CommandSyntaxError};

/// Work performed when a node is the matched end of a command line.
///
/// Returns the command's integer result. Executors may themselves fail with
/// a [`CommandSyntaxError`], e.g. when a value read earlier turns out to be
/// unusable.
///
/// Any `Fn(&CommandContext<S>) -> Result<i32, CommandSyntaxError>` closure
/// is an executor.
///
/// # Examples
///
/// ```
/// use marshal_core::{CommandContext, CommandExecutor, CommandSyntaxError};
///
/// struct Echo;
///
/// impl CommandExecutor<i32> for Echo {
///     fn execute(&self, context: &CommandContext<i32>) -> Result<i32, CommandSyntaxError> {
///         Ok(*context.source())
///     }
/// }
///
/// assert_eq!(Echo.execute(&CommandContext::new(7)).unwrap(), 7);
/// ```
pub trait CommandExecutor<S>: Send + Sync {
    fn execute(&self, context: &CommandContext<S>) -> Result<i32, CommandSyntaxError>;
}

impl<S, F> CommandExecutor<S> for F
where
    F: Fn(&CommandContext<S>) -> Result<i32, CommandSyntaxError> + Send + Sync,
{
    fn execute(&self, context: &CommandContext<S>) -> Result<i32, CommandSyntaxError> {
        self(context)
    }
}
