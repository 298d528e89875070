//! Command registry.
//!
//! Places [`BotCommand`]s into the command tree by their invoke path and keeps
//! track of what was registered so commands can be removed again:
//!
//! ```text
//! register "list"       tree: list ─ BotCommand
//! register "list add"   tree: list ─┬─ ""  ─ BotCommand (list)
//!                                   └─ add ─ BotCommand (list add)
//! register "list add"   tree: list ─┬─ ""  ─ BotCommand (list)
//!   (second signature)              └─ add ─ OverloadedFunctionCommand
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use chatcmd_types::CommandError;
use regex::Regex;

use super::{BotCommand, CommandGroup, CommandRef, Node, OverloadedFunctionCommand};

/// Invoke paths are lowercase words separated by single spaces.
static INVOKE_PATH_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-z]+( [a-z]+)*$"));

/// Check that `path` is a valid invoke path.
pub(crate) fn validate_path(path: &str) -> Result<(), CommandError> {
    let pattern = INVOKE_PATH_RE
        .as_ref()
        .map_err(|e| CommandError::Internal(e.to_string()))?;
    if pattern.is_match(path) {
        Ok(())
    } else {
        Err(CommandError::InvalidPath {
            path: path.to_string(),
            message: "expected lowercase words separated by single spaces".into(),
        })
    }
}

/// Registered commands, keyed by invoke path.
pub struct CommandRegistry {
    tree: Arc<CommandGroup>,
    commands: RwLock<BTreeMap<String, Vec<BotCommand>>>,
}

impl CommandRegistry {
    pub fn new(tree: Arc<CommandGroup>) -> Self {
        Self {
            tree,
            commands: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a command.
    ///
    /// A second command at the same path becomes an overload. Fails on an
    /// invalid path, on a signature that is already registered at the path,
    /// and when the path is taken by something the registry does not own
    /// (an alias, a command added directly to the tree).
    pub fn register(&self, command: BotCommand) -> Result<(), CommandError> {
        let path = command.path().to_string();
        validate_path(&path)?;

        let mut commands = self.commands.write().unwrap_or_else(PoisonError::into_inner);
        let name = command.full_qualified_name();
        if commands
            .values()
            .flatten()
            .any(|existing| existing.full_qualified_name() == name)
        {
            return Err(CommandError::DuplicateCommand(name));
        }

        let existing = commands.get(&path).cloned().unwrap_or_default();
        let fresh = existing.is_empty();
        let mut entry = existing;
        entry.push(command);

        let takes_args = entry.iter().any(|c| c.function().positional_count() > 0);
        self.place(&path, build_node(&entry)?, fresh, takes_args)?;
        tracing::info!(command = %name, overloads = entry.len(), "registered command");
        commands.insert(path, entry);
        Ok(())
    }

    /// Remove every command registered at `path`. Returns what was removed.
    pub fn unregister(&self, path: &str) -> Vec<BotCommand> {
        let mut commands = self.commands.write().unwrap_or_else(PoisonError::into_inner);
        let Some(removed) = commands.remove(path) else {
            return Vec::new();
        };
        self.detach(path);
        tracing::info!(path, count = removed.len(), "unregistered commands");
        removed
    }

    /// Remove a single overload by its full qualified name.
    pub fn unregister_overload(&self, full_qualified_name: &str) -> Option<BotCommand> {
        let mut commands = self.commands.write().unwrap_or_else(PoisonError::into_inner);
        let (path, index) = commands.iter().find_map(|(path, entry)| {
            entry
                .iter()
                .position(|c| c.full_qualified_name() == full_qualified_name)
                .map(|index| (path.clone(), index))
        })?;
        let entry = commands.get_mut(&path)?;
        let removed = entry.remove(index);
        if entry.is_empty() {
            commands.remove(&path);
            self.detach(&path);
        } else {
            let takes_args = entry.iter().any(|c| c.function().positional_count() > 0);
            let rebuilt = build_node(entry.as_slice())
                .and_then(|node| self.place(&path, node, false, takes_args));
            if let Err(err) = rebuilt {
                tracing::warn!(path, error = %err, "could not rebuild overloads");
            }
        }
        tracing::info!(command = full_qualified_name, "unregistered overload");
        Some(removed)
    }

    /// Commands registered at `path`.
    pub fn get(&self, path: &str) -> Vec<BotCommand> {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    /// Every registered command, ordered by path.
    pub fn commands(&self) -> Vec<BotCommand> {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .flatten()
            .cloned()
            .collect()
    }

    /// Put `cmd` at `path`, turning leaves on the way into groups.
    fn place(&self, path: &str, cmd: CommandRef, fresh: bool, takes_args: bool) -> Result<(), CommandError> {
        let parts: Vec<&str> = path.split(' ').collect();
        let (last, parents) = parts.split_last().ok_or_else(|| CommandError::InvalidPath {
            path: path.to_string(),
            message: "empty path".into(),
        })?;
        let mut group = self.tree.clone();
        for part in parents {
            group = group.child_group(part, true)?;
        }
        let (group, slot) = match group.get(last) {
            Some(Node::Group(inner)) => (inner, ""),
            _ => (group, *last),
        };
        if fresh && group.contains(slot) {
            return Err(CommandError::DuplicateCommand(path.to_string()));
        }
        if slot.is_empty() && takes_args {
            tracing::warn!(
                path,
                "command takes arguments but sits on a group; it is only reachable without arguments"
            );
        }
        group.replace(slot, Node::Leaf(cmd));
        Ok(())
    }

    /// Remove whatever the registry placed at `path`.
    fn detach(&self, path: &str) {
        let mut parts: Vec<&str> = path.split(' ').collect();
        if self.tree.lookup(&parts).is_some_and(|node| node.is_group()) {
            parts.push("");
        }
        self.tree.remove_path(&parts);
    }
}

/// The tree node for the commands at one path.
fn build_node(entry: &[BotCommand]) -> Result<CommandRef, CommandError> {
    match entry {
        [] => Err(CommandError::Internal("no command to place".into())),
        [single] => Ok(Arc::new(single.clone())),
        many => {
            let help: String = many.iter().map(BotCommand::help_text).collect();
            let functions = many.iter().map(|c| c.function().clone()).collect();
            Ok(Arc::new(OverloadedFunctionCommand::new(functions).with_help(help)))
        }
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let commands = self.commands.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("CommandRegistry")
            .field("paths", &commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{
        Command, ExecContext, FunctionCommand, NativeValue, Param, ParamType, StringCommand,
    };
    use chatcmd_types::{CommandMeta, ResultKind};

    fn cmd(path: &str, params: Vec<Param>, out: &'static str) -> BotCommand {
        BotCommand::new(
            CommandMeta::new(path).description(out),
            FunctionCommand::new(path, params, move |_, _| Ok(NativeValue::from(out))),
        )
    }

    fn run(tree: &Arc<CommandGroup>, args: &[&str]) -> Result<String, CommandError> {
        let args: Vec<CommandRef> = args
            .iter()
            .map(|a| Arc::new(StringCommand::new(*a)) as CommandRef)
            .collect();
        tree.execute(&mut ExecContext::new(), &args, ResultKind::STRING)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| CommandError::Internal("not a string".into()))
    }

    fn setup() -> (Arc<CommandGroup>, CommandRegistry) {
        let tree = CommandGroup::new();
        let registry = CommandRegistry::new(tree.clone());
        (tree, registry)
    }

    #[test]
    fn invoke_path_pattern() {
        assert!(INVOKE_PATH_RE.is_ok());
        for path in ["play", "list add", "a b c"] {
            assert!(validate_path(path).is_ok(), "{path:?} should be accepted");
        }
    }

    #[test]
    fn rejects_invalid_paths() {
        let (_tree, registry) = setup();
        for path in ["", "Play", "list  add", "list add ", "play1"] {
            assert!(
                matches!(
                    registry.register(cmd(path, vec![], "x")),
                    Err(CommandError::InvalidPath { .. })
                ),
                "{path:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_duplicate_signature() {
        let (_tree, registry) = setup();
        registry.register(cmd("play", vec![], "a")).unwrap();
        assert_eq!(
            registry.register(cmd("play", vec![], "b")).unwrap_err(),
            CommandError::DuplicateCommand("play ()".into())
        );
    }

    #[test]
    fn same_path_becomes_overload() {
        let (tree, registry) = setup();
        registry
            .register(cmd("vol", vec![Param::Plain(ParamType::String)], "STRING"))
            .unwrap();
        registry
            .register(cmd("vol", vec![Param::Plain(ParamType::Int)], "INT"))
            .unwrap();
        assert_eq!(run(&tree, &["vol", "5"]).unwrap(), "INT");
        assert_eq!(run(&tree, &["vol", "up"]).unwrap(), "STRING");
        assert_eq!(registry.get("vol").len(), 2);
    }

    #[test]
    fn leaf_becomes_group_when_deeper_path_registers() {
        let (tree, registry) = setup();
        registry.register(cmd("list", vec![], "LIST")).unwrap();
        registry.register(cmd("list add", vec![], "ADD")).unwrap();
        assert_eq!(run(&tree, &["list"]).unwrap(), "LIST");
        assert_eq!(run(&tree, &["list", "add"]).unwrap(), "ADD");
    }

    #[test]
    fn leaf_on_existing_group_goes_to_empty_name() {
        let (tree, registry) = setup();
        registry.register(cmd("list add", vec![], "ADD")).unwrap();
        registry.register(cmd("list", vec![], "LIST")).unwrap();
        assert!(tree.lookup(&["list", ""]).is_some());
        assert_eq!(run(&tree, &["list"]).unwrap(), "LIST");
    }

    #[test]
    fn refuses_paths_owned_by_others() {
        let (tree, registry) = setup();
        tree.add_path(&["hi"], Arc::new(StringCommand::new("alias"))).unwrap();
        assert_eq!(
            registry.register(cmd("hi", vec![], "x")).unwrap_err(),
            CommandError::DuplicateCommand("hi".into())
        );
    }

    #[test]
    fn unregister_prunes_groups() {
        let (tree, registry) = setup();
        registry.register(cmd("list", vec![], "LIST")).unwrap();
        registry.register(cmd("list add", vec![], "ADD")).unwrap();
        assert_eq!(registry.unregister("list add").len(), 1);
        assert_eq!(run(&tree, &["list"]).unwrap(), "LIST");
        assert_eq!(registry.unregister("list").len(), 1);
        assert!(tree.is_empty());
        assert!(registry.unregister("list").is_empty());
    }

    #[test]
    fn unregister_single_overload() {
        let (tree, registry) = setup();
        registry
            .register(cmd("vol", vec![Param::Plain(ParamType::String)], "STRING"))
            .unwrap();
        registry
            .register(cmd("vol", vec![Param::Plain(ParamType::Int)], "INT"))
            .unwrap();
        assert!(registry.unregister_overload("vol (int)").is_some());
        assert_eq!(run(&tree, &["vol", "5"]).unwrap(), "STRING");
        assert!(registry.unregister_overload("vol (int)").is_none());
        assert!(registry.unregister_overload("vol (string)").is_some());
        assert!(tree.is_empty());
    }

    #[test]
    fn overload_help_joins_every_signature() {
        let (tree, registry) = setup();
        registry
            .register(cmd("vol", vec![Param::Plain(ParamType::String)], "by name"))
            .unwrap();
        registry
            .register(cmd("vol", vec![Param::Plain(ParamType::Int)], "by number"))
            .unwrap();
        let help = tree.lookup(&["vol"]).and_then(|n| n.command().help()).unwrap();
        assert_eq!(help, "\n!vol: by name\n!vol: by number");
    }
}
