//! chatcmd REPL: type chat lines, see what the bot would answer.
//!
//! - Run lines through a [`Kernel`] with a configurable kind list (`/kinds`)
//! - Print the parsed s-expression of each line (`/ast` toggle)
//! - Meta-commands: `/help`, `/quit`, `/ast`, `/kinds`, `/aliases`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use chatcmd_kernel::ast::sexpr;
use chatcmd_kernel::interpreter::format_kinds;
use chatcmd_kernel::{parse, CommandResult, Kernel, KernelConfig, ResultKind};

/// Environment variable naming a config file to load instead of the default one.
pub const CONFIG_ENV: &str = "CHATCMD_CONFIG";

/// REPL state.
pub struct Repl {
    kernel: Kernel,
    kinds: Vec<ResultKind>,
    show_ast: bool,
}

/// What the caller should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this.
    Output(String),
    /// Nothing to show.
    Silent,
    /// Leave the loop.
    Quit,
}

impl Repl {
    pub fn new(config: KernelConfig) -> Result<Self> {
        let kernel = Kernel::new(config).context("failed to start kernel")?;
        Ok(Self {
            kernel,
            kinds: ResultKind::STRING_OR_EMPTY.to_vec(),
            show_ast: false,
        })
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Process a single line of input.
    ///
    /// Command failures are not errors here; they come back as output text.
    pub fn process_line(&mut self, line: &str) -> Outcome {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Outcome::Silent;
        }
        if let Some(meta) = trimmed.strip_prefix('/') {
            return self.handle_meta_command(meta);
        }

        let ast = parse(trimmed);
        let mut output = Vec::new();
        if self.show_ast {
            output.push(sexpr::format(&ast));
        }

        let mut ctx = self.kernel.context();
        match self.kernel.execute_ast(&mut ctx, &ast, &[], &self.kinds) {
            Ok(result) => {
                if let Some(text) = format_result(&result) {
                    output.push(text);
                }
            }
            Err(err) => {
                tracing::debug!(reason = ?err.reason(), "line failed");
                output.push(format!("error: {err}"));
            }
        }

        if output.is_empty() {
            Outcome::Silent
        } else {
            Outcome::Output(output.join("\n"))
        }
    }

    fn handle_meta_command(&mut self, meta: &str) -> Outcome {
        let mut words = meta.split_whitespace();
        let name = words.next().unwrap_or_default();
        match name {
            "quit" | "q" | "exit" => Outcome::Quit,
            "help" | "h" | "?" => Outcome::Output(HELP_TEXT.trim_end().to_string()),
            "ast" => {
                self.show_ast = !self.show_ast;
                let state = if self.show_ast { "on" } else { "off" };
                Outcome::Output(format!("AST display: {state}"))
            }
            "kinds" => {
                let names: Vec<&str> = words.collect();
                if names.is_empty() {
                    return Outcome::Output(format!("kinds: {}", format_kinds(&self.kinds)));
                }
                let mut kinds = Vec::with_capacity(names.len());
                for name in names {
                    match ResultKind::from_name(name) {
                        Some(kind) => kinds.push(kind),
                        None => return Outcome::Output(format!("unknown kind: {name}")),
                    }
                }
                self.kinds = kinds;
                Outcome::Output(format!("kinds: {}", format_kinds(&self.kinds)))
            }
            "aliases" => {
                let aliases = self.kernel.aliases();
                if aliases.is_empty() {
                    return Outcome::Output("(no aliases)".to_string());
                }
                let lines: Vec<String> = aliases
                    .iter()
                    .map(|(name, text)| format!("{name} = {text}"))
                    .collect();
                Outcome::Output(lines.join("\n"))
            }
            other => Outcome::Output(format!("unknown meta-command: /{other} (try /help)")),
        }
    }
}

fn format_result(result: &CommandResult) -> Option<String> {
    match result {
        CommandResult::String(text) => Some(text.clone()),
        CommandResult::Empty => None,
        CommandResult::Command(_) => Some("<command>".to_string()),
        CommandResult::Enumerable(items) => Some(items.join("\n")),
        CommandResult::Extension { kind, .. } => Some(format!("<{kind}>")),
    }
}

const HELP_TEXT: &str = r#"chatcmd REPL

Meta-commands:
  /help, /h, /?       Show this help
  /quit, /q, /exit    Exit the REPL
  /ast                Toggle s-expression display
  /kinds [<kind>...]  Show or set the requested result kinds
                      (string, empty, command, enumerable)
  /aliases            List aliases

Command lines:
  !print a b          Run a command
  !print (!rng 6)     Nest commands in parentheses
  !take 1 "a b"       Quote text that contains spaces
  !help               List all commands
"#;

/// The config file to use: `$CHATCMD_CONFIG`, else `<config dir>/chatcmd/config.json`.
pub fn config_path(env: Option<PathBuf>) -> Option<PathBuf> {
    env.or_else(|| BaseDirs::new().map(|dirs| dirs.config_dir().join("chatcmd").join("config.json")))
}

/// Load the config at `path`. A missing default file means the default config.
pub fn load_config(path: Option<&Path>, explicit: bool) -> Result<KernelConfig> {
    match path {
        Some(path) if explicit || path.exists() => KernelConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display())),
        _ => Ok(KernelConfig::default()),
    }
}

fn history_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.data_dir().join("chatcmd").join("history.txt"))
}

/// Run the REPL.
pub fn run() -> Result<()> {
    let env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let explicit = env.is_some();
    let config = load_config(config_path(env).as_deref(), explicit)?;
    let mut repl = Repl::new(config)?;

    println!(
        "{} v{}, bot \"{}\"",
        "chatcmd".bold(),
        env!("CARGO_PKG_VERSION"),
        repl.kernel().name()
    );
    println!("Type /help for meta-commands, /quit to exit.\n");

    let mut rl: Editor<(), DefaultHistory> = Editor::new().context("failed to create editor")?;

    let history_path = history_path();
    if let Some(ref path) = history_path {
        // No history yet on first run.
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match repl.process_line(&line) {
                    Outcome::Output(text) if text.starts_with("error: ") => {
                        println!("{}", text.red());
                    }
                    Outcome::Output(text) => println!("{text}"),
                    Outcome::Silent => {}
                    Outcome::Quit => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("{} {err}", "error:".red());
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = rl.save_history(path) {
            tracing::warn!(path = %path.display(), %err, "failed to save history");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = PathBuf::from("/tmp/bot.json");
        assert_eq!(config_path(Some(path.clone())), Some(path));
    }

    #[test]
    fn missing_default_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(load_config(Some(&path), false).unwrap(), KernelConfig::default());
        assert!(load_config(Some(&path), true).is_err());
        assert_eq!(load_config(None, false).unwrap(), KernelConfig::default());
    }
}
