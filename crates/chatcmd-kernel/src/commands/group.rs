//! Namespaces of the command tree.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use chatcmd_types::{CommandError, ResultKind};

use super::{filter_names, Command, CommandRef, ExecContext};
use crate::interpreter::CommandResult;

/// A child of a group.
#[derive(Clone)]
pub enum Node {
    Group(Arc<CommandGroup>),
    Leaf(CommandRef),
}

impl Node {
    /// The node as an executable command.
    pub fn command(&self) -> CommandRef {
        match self {
            Node::Group(group) => group.clone(),
            Node::Leaf(cmd) => cmd.clone(),
        }
    }

    pub fn as_group(&self) -> Option<&Arc<CommandGroup>> {
        match self {
            Node::Group(group) => Some(group),
            Node::Leaf(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Group(group) => write!(f, "Group({:?})", group.names()),
            Node::Leaf(cmd) => write!(f, "Leaf({})", cmd.describe()),
        }
    }
}

/// A namespace of commands, dispatching on its first argument.
///
/// The child map sits behind a reader/writer lock. Locks are held only to
/// look up or change children, never while a child runs, so a command may
/// add or remove commands while executing.
pub struct CommandGroup {
    this: Weak<CommandGroup>,
    children: RwLock<BTreeMap<String, Node>>,
}

impl CommandGroup {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            children: RwLock::new(BTreeMap::new()),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Node>> {
        self.children.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Node>> {
        self.children.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a child. Fails if the name is taken.
    pub fn insert(&self, name: &str, node: Node) -> Result<(), CommandError> {
        let mut children = self.write();
        if children.contains_key(name) {
            return Err(CommandError::DuplicateCommand(name.to_string()));
        }
        children.insert(name.to_string(), node);
        Ok(())
    }

    /// Set a child, returning the node it replaced.
    pub fn replace(&self, name: &str, node: Node) -> Option<Node> {
        self.write().insert(name.to_string(), node)
    }

    pub fn remove(&self, name: &str) -> Option<Node> {
        self.write().remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Node> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Child names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// The group called `name`, created if missing.
    ///
    /// A leaf in the way is an error, unless `absorb_leaf` is set: then the
    /// leaf moves into the new group under the empty name, where it stays
    /// reachable by calling the group without arguments.
    pub fn child_group(&self, name: &str, absorb_leaf: bool) -> Result<Arc<CommandGroup>, CommandError> {
        let mut children = self.write();
        match children.get(name) {
            Some(Node::Group(group)) => Ok(group.clone()),
            Some(Node::Leaf(leaf)) => {
                if !absorb_leaf {
                    return Err(CommandError::InvalidPath {
                        path: name.to_string(),
                        message: "a command already exists at this name".into(),
                    });
                }
                let group = CommandGroup::new();
                group.write().insert(String::new(), Node::Leaf(leaf.clone()));
                children.insert(name.to_string(), Node::Group(group.clone()));
                Ok(group)
            }
            None => {
                let group = CommandGroup::new();
                children.insert(name.to_string(), Node::Group(group.clone()));
                Ok(group)
            }
        }
    }

    /// Add a command at a path of names, creating groups on the way.
    pub fn add_path(&self, path: &[&str], cmd: CommandRef) -> Result<(), CommandError> {
        let (last, parents) = path.split_last().ok_or_else(|| CommandError::InvalidPath {
            path: String::new(),
            message: "empty path".into(),
        })?;
        let mut group = self.this.upgrade().ok_or_else(detached)?;
        for part in parents {
            group = group.child_group(part, false)?;
        }
        group.insert(last, Node::Leaf(cmd)).map_err(|_| {
            CommandError::DuplicateCommand(path.join(" "))
        })
    }

    /// The node at a path of exact names.
    pub fn lookup(&self, path: &[&str]) -> Option<Node> {
        let (first, rest) = path.split_first()?;
        let node = self.get(first)?;
        if rest.is_empty() {
            return Some(node);
        }
        node.as_group()?.lookup(rest)
    }

    /// Remove the node at a path. Groups left empty on the way are removed too.
    pub fn remove_path(&self, path: &[&str]) -> Option<Node> {
        match path {
            [] => None,
            [name] => self.remove(name),
            [first, rest @ ..] => {
                let child = self.get(first)?;
                let removed = child.as_group()?.remove_path(rest);
                if removed.is_some() {
                    let mut children = self.write();
                    let emptied = matches!(children.get(*first), Some(Node::Group(g)) if g.is_empty());
                    if emptied {
                        children.remove(*first);
                    }
                }
                removed
            }
        }
    }

    /// Resolve a (possibly abbreviated) child name.
    pub fn resolve(&self, name: &str) -> Result<(String, Node), CommandError> {
        let children = self.read();
        let matches = filter_names(children.keys().map(String::as_str), name);
        match matches.as_slice() {
            [] => Err(CommandError::NameNotFound {
                name: name.to_string(),
            }),
            [single] => {
                let node = children.get(*single).cloned().ok_or_else(|| {
                    CommandError::Internal(format!("filtered name \"{single}\" vanished"))
                })?;
                Ok((single.to_string(), node))
            }
            many => Err(CommandError::AmbiguousName {
                candidates: many.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// Resolve `name` and run the child on the remaining arguments.
    pub fn dispatch(
        &self,
        ctx: &mut ExecContext,
        name: &str,
        rest: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        let (resolved, node) = self.resolve(name)?;
        tracing::debug!(name, resolved = %resolved, "resolved command");
        node.command().execute(ctx, rest, kinds)
    }
}

fn detached() -> CommandError {
    CommandError::Internal("command group is not owned by an Arc".into())
}

impl Command for CommandGroup {
    fn execute(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        let Some((first, rest)) = args.split_first() else {
            if kinds.contains(&ResultKind::Command) {
                if let Some(this) = self.this.upgrade() {
                    return Ok(CommandResult::Command(this));
                }
            }
            if let Some(node) = self.get("") {
                return node.command().execute(ctx, &[], kinds);
            }
            return Err(CommandError::arity("expected a string"));
        };
        let name = first.execute_string(ctx)?;
        self.dispatch(ctx, &name, rest, kinds)
    }

    fn describe(&self) -> String {
        format!("group [{}]", self.names().join(", "))
    }

    fn help(&self) -> Option<String> {
        let names: Vec<String> = self.names().into_iter().filter(|n| !n.is_empty()).collect();
        Some(format!(
            "The command contains the following subfunctions: {}",
            names.join(", ")
        ))
    }
}

impl std::fmt::Debug for CommandGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.read().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::StringCommand;

    /// Returns its own name, so tests can see which leaf ran.
    struct Named(&'static str);

    impl Command for Named {
        fn execute(
            &self,
            _ctx: &mut ExecContext,
            _args: &[CommandRef],
            _kinds: &[ResultKind],
        ) -> Result<CommandResult, CommandError> {
            Ok(CommandResult::string(self.0))
        }

        fn describe(&self) -> String {
            self.0.into()
        }
    }

    fn leaf(name: &'static str) -> CommandRef {
        Arc::new(Named(name))
    }

    fn lit(text: &str) -> CommandRef {
        Arc::new(StringCommand::new(text))
    }

    fn run(group: &CommandGroup, args: &[&str], kinds: &[ResultKind]) -> Result<CommandResult, CommandError> {
        let args: Vec<CommandRef> = args.iter().map(|a| lit(a)).collect();
        group.execute(&mut ExecContext::new(), &args, kinds)
    }

    #[test]
    fn dispatches_on_fuzzy_name() {
        let root = CommandGroup::new();
        root.add_path(&["play"], leaf("play")).unwrap();
        root.add_path(&["pause"], leaf("pause")).unwrap();
        root.add_path(&["list", "add"], leaf("list add")).unwrap();
        assert_eq!(run(&root, &["pl"], ResultKind::STRING).unwrap().as_str(), Some("play"));
        assert_eq!(
            run(&root, &["li", "a"], ResultKind::STRING).unwrap().as_str(),
            Some("list add")
        );
    }

    #[test]
    fn ambiguous_and_missing_names() {
        let root = CommandGroup::new();
        assert_eq!(
            run(&root, &["x"], ResultKind::STRING).unwrap_err(),
            CommandError::NameNotFound { name: "x".into() }
        );
        root.add_path(&["pla"], leaf("pla")).unwrap();
        root.add_path(&["ply"], leaf("ply")).unwrap();
        assert_eq!(
            run(&root, &["p"], ResultKind::STRING).unwrap_err(),
            CommandError::AmbiguousName {
                candidates: vec!["pla".into(), "ply".into()]
            }
        );
    }

    #[test]
    fn zero_arguments() {
        let root = CommandGroup::new();
        root.add_path(&["x"], leaf("x")).unwrap();
        let result = run(&root, &[], &[ResultKind::Command, ResultKind::String]).unwrap();
        assert_eq!(result.kind(), ResultKind::Command);
        assert_eq!(
            run(&root, &[], ResultKind::STRING).unwrap_err(),
            CommandError::arity("expected a string")
        );
        root.add_path(&[""], leaf("default")).unwrap();
        assert_eq!(run(&root, &[], ResultKind::STRING).unwrap().as_str(), Some("default"));
    }

    #[test]
    fn duplicate_and_blocked_paths() {
        let root = CommandGroup::new();
        root.add_path(&["a"], leaf("a")).unwrap();
        assert_eq!(
            root.add_path(&["a"], leaf("again")).unwrap_err(),
            CommandError::DuplicateCommand("a".into())
        );
        assert!(matches!(
            root.add_path(&["a", "b"], leaf("a b")),
            Err(CommandError::InvalidPath { .. })
        ));
    }

    #[test]
    fn absorbing_a_leaf_keeps_it_reachable() {
        let root = CommandGroup::new();
        root.add_path(&["list"], leaf("list")).unwrap();
        let group = root.child_group("list", true).unwrap();
        group.insert("add", Node::Leaf(leaf("list add"))).unwrap();
        assert_eq!(run(&root, &["list"], ResultKind::STRING).unwrap().as_str(), Some("list"));
        assert_eq!(
            run(&root, &["list", "add"], ResultKind::STRING).unwrap().as_str(),
            Some("list add")
        );
    }

    #[test]
    fn remove_prunes_empty_groups() {
        let root = CommandGroup::new();
        root.add_path(&["a", "b", "c"], leaf("c")).unwrap();
        root.add_path(&["a", "d"], leaf("d")).unwrap();
        assert!(root.remove_path(&["a", "b", "c"]).is_some());
        assert!(root.lookup(&["a", "b"]).is_none());
        assert!(root.lookup(&["a", "d"]).is_some());
        assert!(root.remove_path(&["a", "d"]).is_some());
        assert!(root.is_empty());
        assert!(root.remove_path(&["a"]).is_none());
    }
}
