//! alias: manage user defined commands at runtime.

use chatcmd_types::{CommandError, CommandMeta};

use crate::commands::{AliasTable, BotCommand, FunctionCommand, NativeValue, Param, ParamType};

pub(super) fn add(aliases: AliasTable) -> BotCommand {
    let meta = CommandMeta::new("alias add")
        .description("Adds a new command that runs a command line.")
        .usage("<name> <command...>", "Runs <command> when !<name> is called; use !param <n> for arguments");
    let function = FunctionCommand::new(
        "alias add",
        vec![Param::Plain(ParamType::String), Param::ArrayTail],
        move |_, p| {
            let name = p.str(0)?;
            let text = p.array(1)?.join(" ");
            aliases.add(name, &text)?;
            Ok(NativeValue::Unit)
        },
    );
    BotCommand::new(meta, function)
}

pub(super) fn remove(aliases: AliasTable) -> BotCommand {
    let meta = CommandMeta::new("alias remove")
        .description("Removes an alias.")
        .usage("<name>", "The alias to remove");
    let function = FunctionCommand::new(
        "alias remove",
        vec![Param::Plain(ParamType::String)],
        move |_, p| {
            aliases.remove(p.str(0)?)?;
            Ok(NativeValue::Unit)
        },
    );
    BotCommand::new(meta, function)
}

pub(super) fn show(aliases: AliasTable) -> BotCommand {
    let meta = CommandMeta::new("alias show")
        .description("Shows the command line of an alias.")
        .usage("<name>", "The alias to show");
    let function = FunctionCommand::new(
        "alias show",
        vec![Param::Plain(ParamType::String)],
        move |_, p| {
            let name = p.str(0)?;
            let text = aliases.get(name).ok_or_else(|| CommandError::NameNotFound {
                name: name.to_string(),
            })?;
            Ok(NativeValue::from(text))
        },
    );
    BotCommand::new(meta, function)
}

pub(super) fn list(aliases: AliasTable) -> BotCommand {
    let meta = CommandMeta::new("alias list").description("Lists all aliases.");
    let function = FunctionCommand::new("alias list", Vec::<Param>::new(), move |_, _| {
        let names: Vec<String> = aliases.list().into_iter().map(|(name, _)| name).collect();
        Ok(NativeValue::List(names))
    });
    BotCommand::new(meta, function)
}

#[cfg(test)]
mod tests {
    use crate::commands::builtin::testing::Harness;
    use chatcmd_types::{CommandError, ResultKind};

    #[test]
    fn add_show_list_remove() {
        let h = Harness::new();
        assert_eq!(h.text("!alias add hi !print hello there").unwrap(), "");
        assert_eq!(h.text("!hi").unwrap(), "hellothere");
        assert_eq!(h.text("!alias show hi").unwrap(), "!print hello there");

        h.text("!alias add yo \"!print yo\"").unwrap();
        assert_eq!(h.text("!alias list").unwrap(), "hi yo");
        let items = h.run("!alias list", &[ResultKind::Enumerable]).unwrap();
        assert_eq!(items.as_items().map(<[String]>::len), Some(2));

        h.text("!alias remove hi").unwrap();
        assert!(h.tree.lookup(&["hi"]).is_none());
        assert!(matches!(h.text("!alias show hi"), Err(CommandError::NameNotFound { .. })));
    }

    #[test]
    fn cannot_replace_builtins() {
        let h = Harness::new();
        assert_eq!(
            h.text("!alias add print !rng").unwrap_err(),
            CommandError::DuplicateCommand("print".into())
        );
    }
}
