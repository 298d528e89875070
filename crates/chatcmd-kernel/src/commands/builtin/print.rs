//! print: concatenate arguments.

use chatcmd_types::CommandMeta;

use crate::commands::{BotCommand, FunctionCommand, NativeValue, Param};

pub(super) fn command() -> BotCommand {
    let meta = CommandMeta::new("print").description("Lets you format multiple parameter to one.");
    let function = FunctionCommand::new("print", vec![Param::ArrayTail], |_, p| {
        Ok(NativeValue::from(p.array(0)?.concat()))
    })
    .with_required(0);
    BotCommand::new(meta, function)
}

#[cfg(test)]
mod tests {
    use crate::commands::builtin::testing::Harness;

    #[test]
    fn concatenates() {
        let h = Harness::new();
        assert_eq!(h.text("!print a b c").unwrap(), "abc");
        assert_eq!(h.text("!print \"a \" (!print b c)").unwrap(), "a bc");
        assert_eq!(h.text("!print").unwrap(), "");
    }
}
