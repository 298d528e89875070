use std::sync::{Arc, Mutex, PoisonError};

use chatcmd_types::{CommandError, ResultKind};

use super::{Command, CommandRef, ExecContext};
use crate::interpreter::{format_kinds, CommandResult};

/// Evaluates its inner command at most once and replays the outcome.
///
/// Arguments are wrapped in a `LazyCommand` whenever a command may look at
/// them more than once (overload attempts, alias parameters), so side effects
/// of an argument happen once. Failures are cached too. A later call asking
/// for kinds that do not include the cached kind fails instead of running the
/// inner command again.
pub struct LazyCommand {
    inner: CommandRef,
    cached: Mutex<Option<Result<CommandResult, CommandError>>>,
}

impl LazyCommand {
    pub fn new(inner: CommandRef) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }

    /// Wrap every argument.
    pub fn wrap_all(args: &[CommandRef]) -> Vec<CommandRef> {
        args.iter()
            .map(|arg| Arc::new(LazyCommand::new(arg.clone())) as CommandRef)
            .collect()
    }

    /// Whether the inner command has run.
    pub fn is_evaluated(&self) -> bool {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl Command for LazyCommand {
    fn execute(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        let cached = self
            .cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let outcome = match cached {
            Some(outcome) => {
                tracing::trace!(command = %self.inner.describe(), "lazy cache hit");
                outcome
            }
            None => {
                // The lock is not held here: the inner command may evaluate
                // other lazy arguments.
                let outcome = self.inner.execute(ctx, args, kinds);
                *self.cached.lock().unwrap_or_else(PoisonError::into_inner) = Some(outcome.clone());
                outcome
            }
        };
        let result = outcome?;
        if result.fits(kinds) {
            Ok(result)
        } else {
            Err(CommandError::NoMatchingReturnKind(format!(
                "{} (cached {}, wanted {})",
                self.inner.describe(),
                result.kind(),
                format_kinds(kinds)
            )))
        }
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn help(&self) -> Option<String> {
        self.inner.help()
    }
}
