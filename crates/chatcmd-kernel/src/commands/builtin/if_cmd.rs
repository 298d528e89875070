//! if: compare two values and run one of two branches.

use std::cmp::Ordering;

use chatcmd_types::{CommandError, CommandMeta, ResultKind};

use crate::commands::{BotCommand, FunctionCommand, NativeValue, Param};
use crate::interpreter::CommandResult;

const OPERATORS: &[&str] = &["<", ">", "<=", ">=", "==", "!="];

pub(super) fn command() -> BotCommand {
    let meta = CommandMeta::new("if")
        .usage(
            "<argument0> <comparator> <argument1> <then>",
            "Compares the two arguments and returns or executes the then-argument",
        )
        .usage(
            "<argument0> <comparator> <argument1> <then> <else>",
            "Same as before and return the else-arguments if the condition is false",
        );
    let function = FunctionCommand::new(
        "if",
        vec![Param::Context, Param::ArgsTail, Param::KindsTail],
        |ctx, p| {
            let args = p.arguments(1)?;
            let kinds = p.kinds(2)?;
            if args.len() < 4 {
                return Err(CommandError::arity("expected at least 4 arguments").into());
            }
            let left = args[0].execute_string(ctx)?;
            let op = args[1].execute_string(ctx)?;
            let right = args[2].execute_string(ctx)?;
            if !OPERATORS.contains(&op.as_str()) {
                return Err(CommandError::native(format!("unknown comparison operator \"{op}\"")).into());
            }

            let branch = if holds(&op, compare(&left, &right)) {
                args.get(3)
            } else {
                args.get(4)
            };
            let result = match branch {
                Some(branch) => branch.execute(ctx, &[], kinds)?,
                None if kinds.contains(&ResultKind::Empty) => CommandResult::Empty,
                None => return Err(CommandError::arity("if found nothing to return").into()),
            };
            Ok(NativeValue::Result(result))
        },
    );
    BotCommand::new(meta, function)
}

/// Numeric order when both sides are numbers, ordinal string order otherwise.
fn compare(left: &str, right: &str) -> Option<Ordering> {
    match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b),
        _ => Some(left.cmp(right)),
    }
}

fn holds(op: &str, ord: Option<Ordering>) -> bool {
    match op {
        "<" => ord == Some(Ordering::Less),
        ">" => ord == Some(Ordering::Greater),
        "<=" => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        ">=" => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
        "==" => ord == Some(Ordering::Equal),
        "!=" => ord != Some(Ordering::Equal),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::builtin::testing::Harness;
    use rstest::rstest;

    #[rstest]
    #[case("!if 2 < 10 yes no", "yes")]
    #[case("!if 2 > 10 yes no", "no")]
    #[case("!if 1.0 == 1 yes no", "yes")]
    #[case("!if abc < abd yes no", "yes")]
    #[case("!if 2 <= 2 yes no", "yes")]
    #[case("!if b >= c yes no", "no")]
    #[case("!if a != a yes no", "no")]
    fn compares(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(Harness::new().text(line).unwrap(), expected);
    }

    #[test]
    fn string_order_is_ordinal() {
        // "10" < "9" as text, but not as numbers.
        assert!(holds("<", compare("10x", "9x")));
        assert!(!holds("<", compare("10", "9")));
    }

    #[test]
    fn false_without_else() {
        let h = Harness::new();
        assert_eq!(h.text("!if 1 == 2 yes").unwrap(), "");
        assert_eq!(
            h.run("!if 1 == 2 yes", ResultKind::STRING).unwrap_err(),
            CommandError::arity("if found nothing to return")
        );
    }

    #[test]
    fn branches_run_lazily() {
        let h = Harness::new();
        // The untaken branch would fail if it ran.
        assert_eq!(h.text("!if 1 == 1 ok (!nothing)").unwrap(), "ok");
    }

    #[test]
    fn rejects_bad_input() {
        let h = Harness::new();
        assert!(matches!(h.text("!if 1 ~ 2 a b"), Err(CommandError::Native(_))));
        assert!(matches!(h.text("!if 1 < 2"), Err(CommandError::Arity(_))));
    }
}
