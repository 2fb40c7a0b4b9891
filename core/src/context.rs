//! Execution context handed to command executors.

/// Carries the opaque source value (a user, session, console handle, ...)
/// that a command is executed for.
///
/// # Examples
///
/// ```
/// use marshal_core::CommandContext;
///
/// let context = CommandContext::new("console");
/// assert_eq!(*context.source(), "console");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext<S> {
    source: S,
}

impl<S> CommandContext<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consumes the context and returns the source.
    pub fn into_source(self) -> S {
        self.source
    }
}
