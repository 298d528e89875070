use chatcmd_types::{CommandError, ResultKind};

use super::{Command, CommandRef, ExecContext};
use crate::interpreter::CommandResult;

/// A literal string argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringCommand {
    content: String,
}

impl StringCommand {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Command for StringCommand {
    fn execute(
        &self,
        _ctx: &mut ExecContext,
        _args: &[CommandRef],
        kinds: &[ResultKind],
    ) -> Result<CommandResult, CommandError> {
        if kinds.contains(&ResultKind::String) {
            Ok(CommandResult::String(self.content.clone()))
        } else {
            Err(CommandError::NoMatchingReturnKind(format!(
                "string literal \"{}\"",
                self.content
            )))
        }
    }

    fn describe(&self) -> String {
        format!("\"{}\"", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_text_when_string_requested() {
        let mut ctx = ExecContext::new();
        let result = StringCommand::new("hi")
            .execute(&mut ctx, &[], ResultKind::COMMAND_OR_STRING)
            .unwrap();
        assert_eq!(result.as_str(), Some("hi"));
    }

    #[test]
    fn fails_without_string_kind() {
        let mut ctx = ExecContext::new();
        let err = StringCommand::new("hi")
            .execute(&mut ctx, &[], &[ResultKind::Command, ResultKind::Empty])
            .unwrap_err();
        assert!(matches!(err, CommandError::NoMatchingReturnKind(_)));
    }
}
