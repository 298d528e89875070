//! take: pick parts of a text.

use chatcmd_types::{CommandError, CommandMeta, ResultKind};

use crate::commands::{BotCommand, FunctionCommand, NativeValue, Param};
use crate::interpreter::{format_kinds, CommandResult};

pub(super) fn command() -> BotCommand {
    let meta = CommandMeta::new("take")
        .description("Take a substring from a string.")
        .usage("<count> <text>", "Take only <count> parts of the text")
        .usage("<count> <start> <text>", "Take <count> parts, starting with the part at <start>")
        .usage(
            "<count> <start> <delimiter> <text>",
            "Specify another delimiter for the parts than spaces",
        );
    let function = FunctionCommand::new(
        "take",
        vec![Param::Context, Param::ArgsTail, Param::KindsTail],
        |ctx, p| {
            let args = p.arguments(1)?;
            let kinds = p.kinds(2)?;
            if args.len() < 2 {
                return Err(CommandError::arity("expected at least 2 arguments").into());
            }

            let count = non_negative(&args[0].execute_string(ctx)?)
                .ok_or_else(|| CommandError::native("count must be an integer >= 0"))?;
            let start = match args.get(1).filter(|_| args.len() > 2) {
                Some(arg) => non_negative(&arg.execute_string(ctx)?)
                    .ok_or_else(|| CommandError::native("start must be an integer >= 0"))?,
                None => 0,
            };
            let delimiter = match args.get(2).filter(|_| args.len() > 3) {
                Some(arg) => Some(arg.execute_string(ctx)?),
                None => None,
            };
            let text = args[(args.len() - 1).min(3)].execute_string(ctx)?;

            let parts = split(&text, delimiter.as_deref());
            let end = start
                .checked_add(count)
                .filter(|end| *end <= parts.len())
                .ok_or_else(|| CommandError::native("not enough parts to take"))?;
            let taken: Vec<String> = parts[start..end].iter().map(|s| s.to_string()).collect();

            for kind in kinds {
                match kind {
                    ResultKind::String => {
                        let joined = taken.join(delimiter.as_deref().unwrap_or(" "));
                        return Ok(NativeValue::Result(CommandResult::String(joined)));
                    }
                    ResultKind::Enumerable => {
                        return Ok(NativeValue::Result(CommandResult::Enumerable(taken)));
                    }
                    _ => {}
                }
            }
            Err(CommandError::NoMatchingReturnKind(format!("take (wanted {})", format_kinds(kinds))).into())
        },
    );
    BotCommand::new(meta, function)
}

fn non_negative(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()
}

/// Whitespace separated words, or the pieces between delimiters. An empty
/// delimiter leaves the text whole.
fn split<'t>(text: &'t str, delimiter: Option<&str>) -> Vec<&'t str> {
    match delimiter {
        None => text.split_whitespace().collect(),
        Some("") => vec![text],
        Some(delimiter) => text.split(delimiter).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::builtin::testing::Harness;
    use rstest::rstest;

    #[rstest]
    #[case("!take 2 \"a b c d\"", "a b")]
    #[case("!take 2 1 \"a b c d\"", "b c")]
    #[case("!take 2 1 , \"a,b,c,d\"", "b,c")]
    #[case("!take 0 \"a b\"", "")]
    #[case("!take 1 \"  spaced   out \"", "spaced")]
    fn takes_parts(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(Harness::new().text(line).unwrap(), expected);
    }

    #[test]
    fn enumerable_result() {
        let result = Harness::new()
            .run("!take 2 1 \"a b c\"", &[ResultKind::Enumerable])
            .unwrap();
        assert_eq!(result.as_items(), Some(&["b".to_string(), "c".to_string()][..]));
    }

    #[test]
    fn errors() {
        let h = Harness::new();
        assert_eq!(
            h.text("!take -1 \"a b\"").unwrap_err(),
            CommandError::native("count must be an integer >= 0")
        );
        assert_eq!(
            h.text("!take 1 x \"a b\"").unwrap_err(),
            CommandError::native("start must be an integer >= 0")
        );
        assert_eq!(
            h.text("!take 3 \"a b\"").unwrap_err(),
            CommandError::native("not enough parts to take")
        );
        assert_eq!(
            h.text("!take 18446744073709551615 1 \"a b\"").unwrap_err(),
            CommandError::native("not enough parts to take")
        );
        assert!(matches!(h.text("!take 1"), Err(CommandError::Arity(_))));
    }

    #[test]
    fn empty_delimiter_keeps_text_whole() {
        assert_eq!(split("a b", Some("")), vec!["a b"]);
    }
}
