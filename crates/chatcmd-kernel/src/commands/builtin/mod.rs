//! Built-in commands.
//!
//! The standard command set every kernel starts with (unless disabled in the
//! config): evaluation and control flow, text helpers, help, parse inspection
//! and alias management.

mod alias;
mod eval;
mod help;
mod if_cmd;
mod param;
mod parse_cmd;
mod print;
mod rng;
mod take;
mod xecute;

use chatcmd_types::CommandError;

use super::{AliasTable, CommandRegistry, RootCommand};

/// Register every built-in command.
///
/// `name` is the bot name shown in the `help` overview.
pub fn register_builtins(
    registry: &CommandRegistry,
    root: &RootCommand,
    aliases: &AliasTable,
    name: &str,
) -> Result<(), CommandError> {
    let commands = [
        eval::command(root.clone()),
        if_cmd::command(),
        take::command(),
        print::command(),
        rng::command(),
        help::command(root.clone(), name),
        param::command(),
        parse_cmd::command(),
        xecute::command(),
        alias::add(aliases.clone()),
        alias::remove(aliases.clone()),
        alias::show(aliases.clone()),
        alias::list(aliases.clone()),
    ];
    for command in commands {
        registry.register(command)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use chatcmd_types::{CommandError, ResultKind};

    use super::register_builtins;
    use crate::commands::{AliasTable, CommandGroup, CommandRegistry, ExecContext, RootCommand};
    use crate::interpreter::CommandResult;
    use crate::parser::parse;

    /// A tree with the builtins registered.
    pub struct Harness {
        pub tree: Arc<CommandGroup>,
        pub root: RootCommand,
        pub registry: CommandRegistry,
        pub aliases: AliasTable,
    }

    impl Harness {
        pub fn new() -> Self {
            let tree = CommandGroup::new();
            let root = RootCommand::new(&tree);
            let registry = CommandRegistry::new(tree.clone());
            let aliases = AliasTable::new(root.clone());
            register_builtins(&registry, &root, &aliases, "testbot").unwrap();
            Self {
                tree,
                root,
                registry,
                aliases,
            }
        }

        pub fn run(&self, line: &str, kinds: &[ResultKind]) -> Result<CommandResult, CommandError> {
            let cmd = self.root.ast_to_command(&parse(line))?;
            cmd.execute(&mut ExecContext::new(), &[], kinds)
        }

        /// Run requesting text; an empty result reads as "".
        pub fn text(&self, line: &str) -> Result<String, CommandError> {
            match self.run(line, ResultKind::STRING_OR_EMPTY)? {
                CommandResult::String(text) => Ok(text),
                CommandResult::Empty => Ok(String::new()),
                other => Err(CommandError::Internal(format!("unexpected {}", other.kind()))),
            }
        }
    }
}
