use std::sync::{Arc, Weak};

use chatcmd_types::{CommandError, ResultKind};

use super::{AppliedCommand, Command, CommandGroup, CommandRef, ExecContext, StringCommand};
use crate::ast::AstNode;
use crate::interpreter::{format_kinds, CommandResult};

/// Entry point of the command tree.
///
/// Behaves like the top-level [`CommandGroup`], except that its first
/// argument may evaluate to a command value: `!(!help) play` runs the
/// command returned by `!help` on `play`.
///
/// Holds the tree weakly. Aliases compiled against the root live inside the
/// tree, and a strong handle would keep the tree alive forever.
#[derive(Clone)]
pub struct RootCommand {
    tree: Weak<CommandGroup>,
}

impl RootCommand {
    pub fn new(tree: &Arc<CommandGroup>) -> Self {
        Self {
            tree: Arc::downgrade(tree),
        }
    }

    /// The tree this root dispatches into.
    pub fn tree(&self) -> Result<Arc<CommandGroup>, CommandError> {
        self.tree
            .upgrade()
            .ok_or_else(|| CommandError::Internal("the command tree was dropped".into()))
    }

    /// Translate a parsed request into an executable command.
    ///
    /// A command node becomes the root applied to its translated parameters;
    /// a value becomes a string literal. Error nodes cannot be translated.
    pub fn ast_to_command(&self, node: &AstNode) -> Result<CommandRef, CommandError> {
        let root: CommandRef = Arc::new(self.clone());
        translate(&root, node)
    }
}

fn translate(root: &CommandRef, node: &AstNode) -> Result<CommandRef, CommandError> {
    match node {
        AstNode::Command(cmd) => {
            let params = cmd
                .parameters
                .iter()
                .map(|param| translate(root, param))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Arc::new(AppliedCommand::new(root.clone(), params)))
        }
        AstNode::Value(value) => Ok(Arc::new(StringCommand::new(value.text.clone()))),
        AstNode::Error(err) => Err(CommandError::Internal(format!(
            "cannot execute an error node: {}",
            err.description
        ))),
    }
}

impl Command for RootCommand {
    fn execute(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        let tree = self.tree()?;
        let Some((first, rest)) = args.split_first() else {
            return tree.execute(ctx, args, kinds);
        };
        match first.execute(ctx, &[], ResultKind::COMMAND_OR_STRING)? {
            CommandResult::Command(cmd) => cmd.execute(ctx, rest, kinds),
            CommandResult::String(name) => tree.dispatch(ctx, &name, rest, kinds),
            other => Err(CommandError::NoMatchingReturnKind(format!(
                "{} (got {}, wanted {})",
                first.describe(),
                other.kind(),
                format_kinds(ResultKind::COMMAND_OR_STRING)
            ))),
        }
    }

    fn describe(&self) -> String {
        "root".into()
    }
}
