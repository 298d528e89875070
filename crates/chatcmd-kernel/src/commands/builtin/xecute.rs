//! xecute: run every argument in order for its side effects.

use chatcmd_types::{CommandMeta, ResultKind};

use crate::commands::{BotCommand, FunctionCommand, NativeValue, Param};

/// Any result will do, nothing preferred.
const ANY_PREFER_EMPTY: &[ResultKind] = &[
    ResultKind::Empty,
    ResultKind::String,
    ResultKind::Enumerable,
    ResultKind::Command,
];

pub(super) fn command() -> BotCommand {
    let meta = CommandMeta::new("xecute")
        .description("Evaluates all parameter.")
        .usage("<commands...>", "Runs each command, discarding the results");
    let function = FunctionCommand::new("xecute", vec![Param::Context, Param::ArgsTail], |ctx, p| {
        for arg in p.arguments(1)? {
            arg.execute(ctx, &[], ANY_PREFER_EMPTY)?;
        }
        Ok(NativeValue::Unit)
    });
    BotCommand::new(meta, function)
}

#[cfg(test)]
mod tests {
    use crate::commands::builtin::testing::Harness;
    use chatcmd_types::CommandError;

    #[test]
    fn runs_arguments_in_order() {
        let h = Harness::new();
        assert_eq!(
            h.text(r#"!xecute (!alias add one "!print 1") (!alias add two "!print 2") plain"#)
                .unwrap(),
            ""
        );
        assert_eq!(h.text("!print (!one) (!two)").unwrap(), "12");
    }

    #[test]
    fn stops_at_the_first_failure() {
        let h = Harness::new();
        assert!(matches!(
            h.text(r#"!xecute (!take x y) (!alias add late "!print late")"#),
            Err(CommandError::Native(_))
        ));
        assert!(h.aliases.get("late").is_none());
    }
}
