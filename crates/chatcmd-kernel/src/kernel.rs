//! The Kernel: the command system of one bot.
//!
//! The Kernel owns the command tree and everything that changes it:
//! - Command tree (groups and leaves, fuzzy dispatch)
//! - Registry (commands with metadata, overload merging)
//! - Alias table (user defined command lines)
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Kernel                           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────┐   │
//! │  │ RootCommand  │─▶│ CommandGroup │◀─│CommandRegistry│   │
//! │  │ (weak handle)│  │    (tree)    │  │  (BotCommand) │   │
//! │  └──────────────┘  └──────────────┘  └───────────────┘   │
//! │         ▲                 ▲                              │
//! │         │          ┌──────────────┐                      │
//! │         └──────────│  AliasTable  │                      │
//! │                    └──────────────┘                      │
//! └──────────────────────────────────────────────────────────┘
//!   text ─▶ parse ─▶ AstNode ─▶ ast_to_command ─▶ execute(ctx, kinds)
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chatcmd_types::{CommandError, ResultKind};
use serde::{Deserialize, Serialize};

use crate::ast::AstNode;
use crate::commands::{
    builtin, validate_path, AliasTable, BotCommand, CommandGroup, CommandRef, CommandRegistry,
    ExecContext, RootCommand,
};
use crate::interpreter::{CommandResult, TokenBudget};
use crate::parser::parse;

/// Configuration for kernel initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Bot name, shown by `help`.
    pub name: String,
    /// Tokens each invocation may spend on alias calls.
    pub complexity_budget: u32,
    /// Aliases compiled at startup, name to command line.
    pub aliases: BTreeMap<String, String>,
    /// Whether to register the built-in commands.
    pub builtins: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            name: "chatcmd".to_string(),
            complexity_budget: 64,
            aliases: BTreeMap::new(),
            builtins: true,
        }
    }
}

/// Failure to load a [`KernelConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl KernelConfig {
    /// A config without builtins or aliases.
    pub fn bare() -> Self {
        Self {
            builtins: false,
            ..Self::default()
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_budget(mut self, tokens: u32) -> Self {
        self.complexity_budget = tokens;
        self
    }

    pub fn with_alias(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.aliases.insert(name.into(), text.into());
        self
    }
}

/// The command system of one bot.
pub struct Kernel {
    config: KernelConfig,
    tree: Arc<CommandGroup>,
    root: RootCommand,
    registry: CommandRegistry,
    aliases: AliasTable,
}

impl Kernel {
    /// Create a kernel, registering builtins and compiling configured aliases.
    pub fn new(config: KernelConfig) -> anyhow::Result<Self> {
        let tree = CommandGroup::new();
        let root = RootCommand::new(&tree);
        let registry = CommandRegistry::new(tree.clone());
        let aliases = AliasTable::new(root.clone());

        if config.builtins {
            builtin::register_builtins(&registry, &root, &aliases, &config.name)
                .context("failed to register builtin commands")?;
        }
        for (name, text) in &config.aliases {
            aliases
                .add(name, text)
                .with_context(|| format!("failed to add alias \"{name}\""))?;
        }
        tracing::debug!(name = %config.name, aliases = config.aliases.len(), "kernel ready");

        Ok(Self {
            config,
            tree,
            root,
            registry,
            aliases,
        })
    }

    /// A kernel with the default config.
    pub fn transient() -> anyhow::Result<Self> {
        Self::new(KernelConfig::default())
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn tree(&self) -> &Arc<CommandGroup> {
        &self.tree
    }

    pub fn root(&self) -> &RootCommand {
        &self.root
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// A fresh context with the configured complexity budget.
    pub fn context(&self) -> ExecContext {
        ExecContext::new().with_budget(TokenBudget::new(self.config.complexity_budget))
    }

    /// Parse and run a line.
    pub fn execute(
        &self,
        ctx: &mut ExecContext,
        text: &str,
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        self.execute_ast(ctx, &parse(text), &[], kinds)
    }

    /// Run a parsed line on extra arguments.
    pub fn execute_ast(
        &self,
        ctx: &mut ExecContext,
        ast: &AstNode,
        args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        let command = self.root.ast_to_command(ast)?;
        command.execute(ctx, args, kinds)
    }

    /// Run a line the way a chat message is run: text or nothing.
    pub fn execute_command(&self, ctx: &mut ExecContext, text: &str) -> Result<Option<String>, CommandError> {
        match self.execute(ctx, text, ResultKind::STRING_OR_EMPTY)? {
            CommandResult::String(text) => Ok(Some(text)),
            CommandResult::Empty => Ok(None),
            other => Err(CommandError::NoMatchingReturnKind(format!(
                "\"{text}\" (got {})",
                other.kind()
            ))),
        }
    }

    /// Place a command in the tree without metadata.
    pub fn add_command(&self, path: &str, command: CommandRef) -> Result<(), CommandError> {
        validate_path(path)?;
        let parts: Vec<&str> = path.split(' ').collect();
        self.tree.add_path(&parts, command)
    }

    /// Remove whatever sits at `path`, groups included. Returns whether something was removed.
    ///
    /// Use [`Kernel::unregister`] and [`Kernel::remove_alias`] for registered
    /// commands and aliases so their bookkeeping stays in sync.
    pub fn remove_command(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split(' ').collect();
        self.tree.remove_path(&parts).is_some()
    }

    pub fn has_command(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split(' ').collect();
        self.tree.lookup(&parts).is_some()
    }

    pub fn register(&self, command: BotCommand) -> Result<(), CommandError> {
        self.registry.register(command)
    }

    pub fn unregister(&self, path: &str) -> Vec<BotCommand> {
        self.registry.unregister(path)
    }

    pub fn add_alias(&self, name: &str, text: &str) -> Result<(), CommandError> {
        self.aliases.add(name, text)
    }

    pub fn remove_alias(&self, name: &str) -> Result<String, CommandError> {
        self.aliases.remove(name)
    }

    /// Every alias as `(name, text)`.
    pub fn aliases(&self) -> Vec<(String, String)> {
        self.aliases.list()
    }
}

impl std::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kernel")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::StringCommand;
    use chatcmd_types::BudgetExhausted;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = KernelConfig::from_json_str(r#"{"name": "bob"}"#).unwrap();
        assert_eq!(config.name, "bob");
        assert_eq!(config.complexity_budget, 64);
        assert!(config.builtins);
        assert!(matches!(
            KernelConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn execute_command_returns_text_or_nothing() {
        let kernel = Kernel::transient().unwrap();
        let mut ctx = kernel.context();
        assert_eq!(
            kernel.execute_command(&mut ctx, "!print a b").unwrap(),
            Some("ab".to_string())
        );
        assert_eq!(kernel.execute_command(&mut ctx, "!alias add x !print x").unwrap(), None);
    }

    #[test]
    fn configured_aliases_are_compiled() {
        let kernel = Kernel::new(KernelConfig::default().with_alias("hi", "!print hi")).unwrap();
        assert_eq!(
            kernel.execute_command(&mut kernel.context(), "!hi").unwrap(),
            Some("hi".to_string())
        );
        assert_eq!(kernel.aliases(), vec![("hi".to_string(), "!print hi".to_string())]);
    }

    #[test]
    fn bad_alias_fails_startup() {
        let config = KernelConfig::bare().with_alias("Bad Name", "!x");
        let err = Kernel::new(config).unwrap_err();
        assert!(err.to_string().contains("Bad Name"));
    }

    #[test]
    fn budget_comes_from_config() {
        let kernel = Kernel::new(KernelConfig::bare().with_budget(3).with_alias("loop", "!loop")).unwrap();
        assert_eq!(
            kernel.execute_command(&mut kernel.context(), "!loop").unwrap_err(),
            CommandError::BudgetExhausted(BudgetExhausted)
        );
    }

    #[test]
    fn tree_mutation() {
        let kernel = Kernel::new(KernelConfig::bare()).unwrap();
        kernel.add_command("greet", Arc::new(StringCommand::new("x"))).unwrap();
        assert!(kernel.has_command("greet"));
        assert!(matches!(
            kernel.add_command("greet", Arc::new(StringCommand::new("y"))),
            Err(CommandError::DuplicateCommand(_))
        ));
        assert!(kernel.remove_command("greet"));
        assert!(!kernel.has_command("greet"));
        assert!(!kernel.remove_command("greet"));
    }
}
