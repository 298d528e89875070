//! help: command overview and detailed help.

use chatcmd_types::{CommandError, CommandMeta};

use crate::commands::{
    BotCommand, Command, CommandGroup, FunctionCommand, NativeValue, Node, Param, RootCommand,
};

pub(super) fn command(root: RootCommand, name: &str) -> BotCommand {
    let meta = CommandMeta::new("help")
        .description("Shows all commands or detailed help about a specific command.")
        .usage("[<command>]", "Any currently accepted command");
    let header = format!(
        "\n========= Welcome to {name} =========\
         \nIf you need any help with a special command use !help <commandName>.\
         \nHere are all possible commands:\n"
    );
    let function = FunctionCommand::new("help", vec![Param::ArrayTail], move |_, p| {
        let path = p.array(0)?;
        let tree = root.tree()?;
        if path.is_empty() {
            let names: Vec<String> = tree.names().into_iter().filter(|n| !n.is_empty()).collect();
            return Ok(NativeValue::from(format!("{header}{}", names.join(", "))));
        }
        Ok(NativeValue::from(describe_path(&tree, path)?))
    })
    .with_required(0);
    BotCommand::new(meta, function)
}

/// Help for the command at `path`, resolving each part with the fuzzy filter.
fn describe_path(tree: &CommandGroup, path: &[String]) -> Result<String, CommandError> {
    let mut walked: Vec<String> = Vec::with_capacity(path.len());
    let (resolved, mut node) = tree.resolve(&path[0])?;
    walked.push(resolved);
    for part in &path[1..] {
        let Some(group) = node.as_group() else {
            return Err(CommandError::native(format!(
                "the command has no further subfunctions after {}",
                walked.join(" ")
            )));
        };
        let (resolved, next) = group.resolve(part)?;
        walked.push(resolved);
        node = next;
    }
    match node {
        Node::Group(group) => group
            .help()
            .ok_or_else(|| CommandError::Internal("groups always have help".into())),
        Node::Leaf(cmd) => cmd.help().ok_or_else(|| {
            CommandError::native(format!("no help can be shown for {}", walked.join(" ")))
        }),
    }
}
