//! User defined commands.
//!
//! An alias is a command line stored under a name. It is parsed and
//! translated once; calling it runs the compiled line with the caller's
//! arguments pushed as a new argument frame, where `!param <n>` reads them.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use chatcmd_types::{CommandError, ResultKind};

use super::registry::validate_path;
use super::{Command, CommandRef, ExecContext, LazyCommand, Node, RootCommand};
use crate::interpreter::CommandResult;
use crate::parser::parse;

/// A compiled command line.
pub struct AliasCommand {
    text: String,
    body: CommandRef,
}

impl AliasCommand {
    /// Parse and translate `text` against `root`.
    pub fn compile(root: &RootCommand, text: impl Into<String>) -> Result<Self, CommandError> {
        let text = text.into();
        let body = root.ast_to_command(&parse(&text))?;
        Ok(Self { text, body })
    }

    /// The source line.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Command for AliasCommand {
    fn execute(
        &self,
        ctx: &mut ExecContext,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        ctx.consume(1)?;
        let frame = LazyCommand::wrap_all(args);
        tracing::debug!(alias = %self.text, args = frame.len(), depth = ctx.frame_depth(), "calling alias");
        let mut guard = ctx.enter_frame(frame);
        self.body.execute(&mut guard, &[], kinds)
    }

    fn describe(&self) -> String {
        format!("alias \"{}\"", self.text)
    }

    fn help(&self) -> Option<String> {
        Some(format!("Alias for: {}", self.text))
    }
}

impl std::fmt::Debug for AliasCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AliasCommand").field("text", &self.text).finish()
    }
}

/// The aliases placed in a command tree, by name.
///
/// Cloning shares the table.
#[derive(Clone)]
pub struct AliasTable {
    root: RootCommand,
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl AliasTable {
    pub fn new(root: RootCommand) -> Self {
        Self {
            root,
            entries: Arc::default(),
        }
    }

    /// Compile `text` and place it in the tree under `name`.
    ///
    /// `name` follows the rules of command paths, so `"list all"` places the
    /// alias inside the `list` group. Fails if the name is taken.
    pub fn add(&self, name: &str, text: &str) -> Result<(), CommandError> {
        validate_path(name)?;
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(name) {
            return Err(CommandError::DuplicateCommand(name.to_string()));
        }
        let alias = AliasCommand::compile(&self.root, text)?;
        let parts: Vec<&str> = name.split(' ').collect();
        self.root.tree()?.add_path(&parts, Arc::new(alias))?;
        tracing::info!(name, text, "added alias");
        entries.insert(name.to_string(), text.to_string());
        Ok(())
    }

    /// Remove an alias, returning its text.
    pub fn remove(&self, name: &str) -> Result<String, CommandError> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let text = entries.remove(name).ok_or_else(|| CommandError::NameNotFound {
            name: name.to_string(),
        })?;
        let tree = self.root.tree()?;
        let mut parts: Vec<&str> = name.split(' ').collect();
        // A command registered below the alias moved it to the group's "" slot.
        if let Some(Node::Group(_)) = tree.lookup(&parts) {
            parts.push("");
        }
        tree.remove_path(&parts);
        tracing::info!(name, "removed alias");
        Ok(text)
    }

    /// The text of an alias.
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Every alias as `(name, text)`, ordered by name.
    pub fn list(&self) -> Vec<(String, String)> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, text)| (name.clone(), text.clone()))
            .collect()
    }
}

impl std::fmt::Debug for AliasTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.list()).finish()
    }
}
