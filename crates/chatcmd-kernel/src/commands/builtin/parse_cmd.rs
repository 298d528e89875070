//! parse command: show how a command line is parsed.

use chatcmd_types::{CommandError, CommandMeta};

use crate::ast::sexpr;
use crate::commands::{BotCommand, FunctionCommand, NativeValue, Param, ParamType};
use crate::parser::{parse, COMMAND_CHAR};

pub(super) fn command() -> BotCommand {
    let meta = CommandMeta::new("parse command")
        .description("Displays the parsed tree of a command line.")
        .usage("<line>", "The command line to parse, starting with !");
    let function = FunctionCommand::new(
        "parse command",
        vec![Param::Plain(ParamType::String)],
        |_, p| {
            let line = p.str(0)?;
            if !line.trim_start().starts_with(COMMAND_CHAR) {
                return Err(CommandError::native("this is not a command").into());
            }
            Ok(NativeValue::from(sexpr::format(&parse(line))))
        },
    );
    BotCommand::new(meta, function)
}

#[cfg(test)]
mod tests {
    use crate::commands::builtin::testing::Harness;
    use chatcmd_types::CommandError;

    #[test]
    fn renders_the_tree() {
        let h = Harness::new();
        assert_eq!(
            h.text(r#"!parse command "!print a (!rng)""#).unwrap(),
            r#"(cmd "print" "a" (cmd "rng"))"#
        );
    }

    #[test]
    fn rejects_plain_text() {
        assert_eq!(
            Harness::new().text("!parse command hello").unwrap_err(),
            CommandError::native("this is not a command")
        );
    }
}
