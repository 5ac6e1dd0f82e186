//! The command capability

use cadence_core::HandlerError;
use std::fmt;

/// A reversible unit of work
///
/// `revert` must restore every piece of state `apply` mutated. Commands must
/// be internally atomic: when `apply` returns an error, nothing was changed.
/// The invoker cannot detect or repair a partial apply.
///
/// Commands run while the invoker's history lock is held, so they must not
/// call back into the invoker that runs them.
pub trait Command: Send {
    fn apply(&mut self) -> Result<(), HandlerError>;

    fn revert(&mut self) -> Result<(), HandlerError>;

    /// Human-readable name used in outcomes and telemetry
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl Command for Box<dyn Command> {
    fn apply(&mut self) -> Result<(), HandlerError> {
        (**self).apply()
    }

    fn revert(&mut self) -> Result<(), HandlerError> {
        (**self).revert()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A command assembled from two closures
///
/// ```
/// use cadence_invoker::{Command, FnCommand};
///
/// let mut cmd = FnCommand::new("noop", || Ok(()), || Ok(()));
/// assert_eq!(cmd.name(), "noop");
/// assert!(cmd.apply().is_ok());
/// ```
pub struct FnCommand<A, R> {
    name: String,
    apply: A,
    revert: R,
}

impl<A, R> FnCommand<A, R>
where
    A: FnMut() -> Result<(), HandlerError> + Send,
    R: FnMut() -> Result<(), HandlerError> + Send,
{
    /// Wrap a pair of closures as a command
    pub fn new(name: impl Into<String>, apply: A, revert: R) -> Self {
        Self {
            name: name.into(),
            apply,
            revert,
        }
    }
}

impl<A, R> Command for FnCommand<A, R>
where
    A: FnMut() -> Result<(), HandlerError> + Send,
    R: FnMut() -> Result<(), HandlerError> + Send,
{
    fn apply(&mut self) -> Result<(), HandlerError> {
        (self.apply)()
    }

    fn revert(&mut self) -> Result<(), HandlerError> {
        (self.revert)()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<A, R> fmt::Debug for FnCommand<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand").field("name", &self.name).finish()
    }
}
