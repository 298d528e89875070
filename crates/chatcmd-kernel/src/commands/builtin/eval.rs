//! eval: run a command value, or a command line built from strings.

use chatcmd_types::{CommandError, CommandMeta, ResultKind};

use crate::commands::{evaluate_strings, BotCommand, FunctionCommand, NativeValue, Param, RootCommand};
use crate::interpreter::{format_kinds, CommandResult};
use crate::parser::parse;

pub(super) fn command(root: RootCommand) -> BotCommand {
    let meta = CommandMeta::new("eval")
        .description("Executes a given command or string")
        .usage("<command> <arguments...>", "Executes the given command on arguments")
        .usage("<strings...>", "Concat the strings and execute them with the command system");
    let function = FunctionCommand::new(
        "eval",
        vec![Param::Context, Param::ArgsTail, Param::KindsTail],
        move |ctx, p| {
            let args = p.arguments(1)?;
            let kinds = p.kinds(2)?;
            let (first, rest) = args
                .split_first()
                .ok_or_else(|| CommandError::arity("need at least one argument to evaluate"))?;

            let result = match first.execute(ctx, &[], ResultKind::COMMAND_OR_STRING)? {
                CommandResult::Command(cmd) => cmd.execute(ctx, rest, kinds)?,
                CommandResult::String(head) => {
                    let mut parts = vec![head];
                    parts.extend(evaluate_strings(ctx, rest)?);
                    let line = parts.join(" ");
                    tracing::debug!(line = %line, "evaluating string");
                    root.ast_to_command(&parse(&line))?.execute(ctx, &[], kinds)?
                }
                other => {
                    return Err(CommandError::NoMatchingReturnKind(format!(
                        "eval argument (got {}, wanted {})",
                        other.kind(),
                        format_kinds(ResultKind::COMMAND_OR_STRING)
                    ))
                    .into());
                }
            };
            Ok(NativeValue::Result(result))
        },
    );
    BotCommand::new(meta, function)
}

#[cfg(test)]
mod tests {
    use crate::commands::builtin::testing::Harness;
    use chatcmd_types::CommandError;

    #[test]
    fn joins_strings_into_a_command_line() {
        let h = Harness::new();
        assert_eq!(h.text("!eval print a b").unwrap(), "ab");
        assert_eq!(h.text("!eval \"!print x\"").unwrap(), "x");
    }

    #[test]
    fn runs_command_values_on_the_rest() {
        let h = Harness::new();
        // Without arguments `!print` curries into a command value.
        assert_eq!(h.text("!eval (!print) a b").unwrap(), "ab");
    }

    #[test]
    fn needs_an_argument() {
        let h = Harness::new();
        assert!(matches!(h.text("!eval"), Err(CommandError::Arity(_))));
    }
}
