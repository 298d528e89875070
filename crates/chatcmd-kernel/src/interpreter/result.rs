//! CommandResult — the negotiated result of every command execution.
//!
//! A caller asks for a list of [`ResultKind`]s, highest priority first, and
//! gets back exactly one `CommandResult` whose kind is in that list:
//!
//! ```text
//! !print (!take 1 "a b")      take is asked for [String]
//! !(!help) play               help is asked for [Command, String]
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chatcmd_types::{CommandError, ResultKind};

use crate::commands::CommandRef;

/// The result of executing a command.
#[derive(Clone)]
pub enum CommandResult {
    /// Text.
    String(String),
    /// Nothing.
    Empty,
    /// A command value, e.g. a partially applied function.
    Command(CommandRef),
    /// A list of strings.
    Enumerable(Vec<String>),
    /// A value of an application-defined kind. The kernel never looks inside.
    Extension {
        kind: &'static str,
        value: Arc<dyn Any + Send + Sync>,
    },
}

impl CommandResult {
    /// Create a string result.
    pub fn string(text: impl Into<String>) -> Self {
        CommandResult::String(text.into())
    }

    /// Create an extension result.
    pub fn extension<T: Any + Send + Sync>(kind: &'static str, value: T) -> Self {
        CommandResult::Extension {
            kind,
            value: Arc::new(value),
        }
    }

    /// The kind this result satisfies.
    pub fn kind(&self) -> ResultKind {
        match self {
            CommandResult::String(_) => ResultKind::String,
            CommandResult::Empty => ResultKind::Empty,
            CommandResult::Command(_) => ResultKind::Command,
            CommandResult::Enumerable(_) => ResultKind::Enumerable,
            CommandResult::Extension { kind, .. } => ResultKind::Extension(kind),
        }
    }

    /// True if the kind of this result is in `kinds`.
    pub fn fits(&self, kinds: &[ResultKind]) -> bool {
        kinds.contains(&self.kind())
    }

    /// The text, if this is a string result.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CommandResult::String(s) => Some(s),
            _ => None,
        }
    }

    /// The command, if this is a command result.
    pub fn as_command(&self) -> Option<&CommandRef> {
        match self {
            CommandResult::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// The items, if this is an enumerable result.
    pub fn as_items(&self) -> Option<&[String]> {
        match self {
            CommandResult::Enumerable(items) => Some(items),
            _ => None,
        }
    }

    /// The payload of an extension result, if it has type `T`.
    pub fn downcast_extension<T: Any>(&self) -> Option<&T> {
        match self {
            CommandResult::Extension { value, .. } => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Check that this result is one of the requested kinds.
    pub fn require(self, kinds: &[ResultKind], what: &str) -> Result<Self, CommandError> {
        if self.fits(kinds) {
            Ok(self)
        } else {
            Err(CommandError::NoMatchingReturnKind(format!(
                "{what} (got {}, wanted {})",
                self.kind(),
                format_kinds(kinds)
            )))
        }
    }
}

impl fmt::Debug for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::String(s) => f.debug_tuple("String").field(s).finish(),
            CommandResult::Empty => write!(f, "Empty"),
            CommandResult::Command(cmd) => write!(f, "Command({})", cmd.describe()),
            CommandResult::Enumerable(items) => f.debug_tuple("Enumerable").field(items).finish(),
            CommandResult::Extension { kind, .. } => write!(f, "Extension({kind})"),
        }
    }
}

/// Render a kind list as `string, empty`.
pub fn format_kinds(kinds: &[ResultKind]) -> String {
    if kinds.is_empty() {
        return "nothing".to_string();
    }
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(CommandResult::string("x").kind(), ResultKind::String);
        assert_eq!(CommandResult::Empty.kind(), ResultKind::Empty);
        assert_eq!(
            CommandResult::Enumerable(vec![]).kind(),
            ResultKind::Enumerable
        );
        assert_eq!(
            CommandResult::extension("json", 5u8).kind(),
            ResultKind::Extension("json")
        );
    }

    #[test]
    fn require_rejects_other_kinds() {
        let err = CommandResult::Empty
            .require(ResultKind::STRING, "print")
            .unwrap_err();
        assert_eq!(
            err,
            CommandError::NoMatchingReturnKind("print (got empty, wanted string)".into())
        );
    }

    #[test]
    fn extension_payload_downcasts() {
        let result = CommandResult::extension("json", String::from("{}"));
        assert_eq!(result.downcast_extension::<String>().map(String::as_str), Some("{}"));
        assert!(result.downcast_extension::<u32>().is_none());
    }
}
