//! param: read an argument of the running alias.

use chatcmd_types::{CommandError, CommandMeta};

use crate::commands::{BotCommand, FunctionCommand, NativeValue, Param, ParamType};

pub(super) fn command() -> BotCommand {
    let meta = CommandMeta::new("param")
        .description("Gets an argument of the alias this is used in.")
        .usage("<index>", "The argument at <index>, starting with 0");
    let function = FunctionCommand::new(
        "param",
        vec![Param::Context, Param::Plain(ParamType::Int), Param::KindsTail],
        |ctx, p| {
            let index = p.int(1)?;
            let kinds = p.kinds(2)?;
            let frame = ctx
                .current_frame()
                .ok_or_else(|| CommandError::native("param can only be used inside an alias"))?;
            let arg = usize::try_from(index)
                .ok()
                .and_then(|i| frame.get(i))
                .cloned()
                .ok_or_else(|| CommandError::native(format!("the alias has no argument {index}")))?;
            // The argument belongs to the alias's caller, so it runs in the caller's frame.
            let result = ctx.with_outer_frame(|outer| arg.execute(outer, &[], kinds))?;
            Ok(NativeValue::Result(result))
        },
    );
    BotCommand::new(meta, function)
}
