use std::sync::Arc;

use chatcmd_types::{CommandError, CommandMeta, ResultKind};

use super::{Command, CommandRef, ExecContext, FunctionCommand, Param};
use crate::interpreter::CommandResult;

/// A registered function together with its metadata.
///
/// Rights are not checked here; `required_right` is for the layer above the
/// kernel that knows who is calling.
#[derive(Clone, Debug)]
pub struct BotCommand {
    meta: Arc<CommandMeta>,
    function: FunctionCommand,
}

impl BotCommand {
    pub fn new(meta: CommandMeta, function: FunctionCommand) -> Self {
        Self {
            meta: Arc::new(meta),
            function,
        }
    }

    pub fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    pub fn function(&self) -> &FunctionCommand {
        &self.function
    }

    /// Space separated invoke path.
    pub fn path(&self) -> &str {
        &self.meta.path
    }

    pub fn required_right(&self) -> &str {
        &self.meta.rights
    }

    /// Path plus positional signature, unique across the registry: `take (int, string[])`.
    pub fn full_qualified_name(&self) -> String {
        let types: Vec<String> = self
            .function
            .params()
            .iter()
            .filter_map(|p| match p {
                Param::Plain(ty) => Some(ty.to_string()),
                Param::ArrayTail => Some("string[]".to_string()),
                _ => None,
            })
            .collect();
        format!("{} ({})", self.meta.path, types.join(", "))
    }

    /// Help text: the description, then one aligned line per usage entry.
    ///
    /// ```text
    ///
    /// !rng: Gets a random number.
    /// !rng             Gets a number between 0 and 2147483647
    /// !rng <max>       Gets a number between 0 and <max>
    /// !rng <min> <max> Gets a number between <min> and <max>
    /// ```
    pub fn help_text(&self) -> String {
        let path = &self.meta.path;
        let mut help = String::new();
        if let Some(description) = self.meta.description.as_deref().filter(|d| !d.is_empty()) {
            help.push_str(&format!("\n!{path}: {description}"));
        }
        let longest = self
            .meta
            .usage
            .iter()
            .map(|u| u.syntax.chars().count())
            .max()
            .unwrap_or(0)
            + 1;
        for usage in &self.meta.usage {
            let pad = " ".repeat(longest - usage.syntax.chars().count());
            help.push_str(&format!("\n!{path} {}{pad}{}", usage.syntax, usage.help));
        }
        help
    }
}

impl Command for BotCommand {
    fn execute(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        self.function.execute(ctx, args, kinds)
    }

    fn describe(&self) -> String {
        self.full_qualified_name()
    }

    fn help(&self) -> Option<String> {
        Some(self.help_text()).filter(|h| !h.is_empty())
    }
}
