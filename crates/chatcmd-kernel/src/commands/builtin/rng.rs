//! rng: random numbers.

use chatcmd_types::{CommandError, CommandMeta};
use rand::Rng;

use crate::commands::{BotCommand, FunctionCommand, NativeValue, Param, ParamType};

pub(super) fn command() -> BotCommand {
    let meta = CommandMeta::new("rng")
        .description("Gets a random number.")
        .usage("", "Gets a number between 0 and 2147483647")
        .usage("<max>", "Gets a number between 0 and <max>")
        .usage("<min> <max>", "Gets a number between <min> and <max>");
    let function = FunctionCommand::new(
        "rng",
        vec![Param::Plain(ParamType::Int), Param::Plain(ParamType::Int)],
        |_, p| {
            let (lo, hi) = bounds(p.opt_int(0)?, p.opt_int(1)?)?;
            let n = if lo == hi {
                lo
            } else {
                rand::rng().random_range(lo..hi)
            };
            Ok(NativeValue::Int(n))
        },
    )
    .with_required(0);
    BotCommand::new(meta, function)
}

/// Half-open range `lo..hi` for the given arguments.
fn bounds(first: Option<i64>, second: Option<i64>) -> Result<(i64, i64), CommandError> {
    match (first, second) {
        (Some(a), Some(b)) => Ok((a.min(b), a.max(b))),
        (Some(max), None) if max <= 0 => Err(CommandError::native("value must be 0 or positive")),
        (Some(max), None) => Ok((0, max)),
        (None, _) => Ok((0, i64::from(i32::MAX))),
    }
}
