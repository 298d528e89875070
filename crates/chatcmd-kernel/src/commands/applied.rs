use chatcmd_types::{CommandError, ResultKind};

use super::{Command, CommandRef, ExecContext};
use crate::interpreter::CommandResult;

/// A command with some leading arguments already bound.
///
/// Produced by currying and by translating AST command nodes (the tree root
/// applied to the node's parameters).
#[derive(Clone)]
pub struct AppliedCommand {
    callee: CommandRef,
    bound: Vec<CommandRef>,
}

impl AppliedCommand {
    pub fn new(callee: CommandRef, bound: Vec<CommandRef>) -> Self {
        Self { callee, bound }
    }

    pub fn callee(&self) -> &CommandRef {
        &self.callee
    }

    pub fn bound(&self) -> &[CommandRef] {
        &self.bound
    }
}

impl Command for AppliedCommand {
    fn execute(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        if args.is_empty() {
            return self.callee.execute(ctx, &self.bound, kinds);
        }
        let mut all = Vec::with_capacity(self.bound.len() + args.len());
        all.extend(self.bound.iter().cloned());
        all.extend(args.iter().cloned());
        self.callee.execute(ctx, &all, kinds)
    }

    fn describe(&self) -> String {
        let bound: Vec<String> = self.bound.iter().map(|arg| arg.describe()).collect();
        format!("{} applied to [{}]", self.callee.describe(), bound.join(", "))
    }

    fn help(&self) -> Option<String> {
        self.callee.help()
    }
}
