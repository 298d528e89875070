//! chatcmd-kernel: the command interpreter of a chat bot.
//!
//! This crate provides:
//!
//! - **Parser**: turns a chat line into an [`ast::AstNode`] tree (never fails)
//! - **AST**: command, value and error nodes with source spans
//! - **Interpreter state**: negotiated results, alias argument frames, complexity budget
//! - **Commands**: native functions, overloads, currying, aliases and the fuzzy command tree
//! - **Kernel**: the tree plus registry, aliases and builtins behind one handle
//!
//! ```
//! use chatcmd_kernel::{Kernel, KernelConfig};
//!
//! let kernel = Kernel::new(KernelConfig::default())?;
//! let mut ctx = kernel.context();
//! assert_eq!(kernel.execute_command(&mut ctx, "!print a (!print b c)")?, Some("abc".into()));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod ast;
pub mod commands;
pub mod interpreter;
pub mod kernel;
pub mod parser;

pub use chatcmd_types::{CommandError, CommandMeta, ErrorReason, ResultKind, Usage};
pub use commands::{BotCommand, Command, CommandRef, ExecContext, FunctionCommand, NativeValue, Param, ParamType};
pub use interpreter::CommandResult;
pub use kernel::{ConfigError, Kernel, KernelConfig};
pub use parser::parse;
