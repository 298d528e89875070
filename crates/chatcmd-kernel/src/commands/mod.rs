//! Command values and the command tree.
//!
//! Everything the interpreter runs is a [`Command`]: literal arguments,
//! native functions, overload sets, aliases, groups of the command tree and
//! the tree root itself. Arguments are passed unevaluated, so a command
//! decides whether, when and as what kind it evaluates each of them.
//!
//! ```text
//! RootCommand ── CommandGroup ── FunctionCommand / OverloadedFunctionCommand
//!      │              └── CommandGroup ── ...          AliasCommand
//!      └─ ast_to_command: AstNode → AppliedCommand(root, [StringCommand | AppliedCommand])
//! ```

mod alias;
mod applied;
mod bot_command;
pub mod builtin;
mod context;
mod filter;
mod function;
mod group;
mod lazy;
mod literal;
mod overloaded;
mod registry;
mod root;

use std::sync::Arc;

use chatcmd_types::{CommandError, ResultKind};

use crate::interpreter::CommandResult;

pub use alias::{AliasCommand, AliasTable};
pub use applied::AppliedCommand;
pub use bot_command::BotCommand;
pub use context::{ExecContext, FrameGuard};
pub use filter::filter_names;
pub use function::{Bound, FunctionCommand, NativeFn, NativeValue, Param, ParamType, Params};
pub use group::{CommandGroup, Node};
pub use lazy::LazyCommand;
pub use literal::StringCommand;
pub use overloaded::OverloadedFunctionCommand;
pub use registry::CommandRegistry;
pub(crate) use registry::validate_path;
pub use root::RootCommand;

/// Shared handle to a command value.
pub type CommandRef = Arc<dyn Command>;

/// Something that can be executed by the interpreter.
pub trait Command: Send + Sync {
    /// Run the command.
    ///
    /// `args` are the unevaluated arguments of the call. `kinds` lists the
    /// acceptable result kinds, highest priority first; the returned result
    /// must have one of them.
    fn execute(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError>;

    /// Short description for diagnostics and logs.
    fn describe(&self) -> String;

    /// Help text, if the command has any.
    fn help(&self) -> Option<String> {
        None
    }

    /// Run without arguments and require a string.
    fn execute_string(&self, ctx: &mut ExecContext) -> Result<String, CommandError> {
        match self.execute(ctx, &[], ResultKind::STRING)? {
            CommandResult::String(text) => Ok(text),
            other => Err(CommandError::NoMatchingReturnKind(format!(
                "{} (got {}, wanted string)",
                self.describe(),
                other.kind()
            ))),
        }
    }
}

/// Evaluate every argument as a string.
pub fn evaluate_strings(
    ctx: &mut ExecContext,
    args: &[CommandRef],
) -> Result<Vec<String>, CommandError> {
    args.iter().map(|arg| arg.execute_string(ctx)).collect()
}
