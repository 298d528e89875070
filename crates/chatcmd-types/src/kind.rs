//! Result kinds: the negotiable shapes of a command result.

use std::fmt;

/// The shape of a value a command can hand back.
///
/// Callers pass an ordered list of kinds, highest priority first, and every
/// command returns the first kind it can satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    /// Plain text.
    String,
    /// Nothing; the command ran for its side effects.
    Empty,
    /// A command value that can be executed later (currying, `!(!cmd)` chains).
    Command,
    /// A list of strings.
    Enumerable,
    /// A kind added by an application layer. The kernel only compares it by name.
    Extension(&'static str),
}

impl ResultKind {
    /// `[String, Empty]`, what a chat line expects back.
    pub const STRING_OR_EMPTY: &'static [ResultKind] = &[ResultKind::String, ResultKind::Empty];
    /// `[String]`, used when an argument is consumed as text.
    pub const STRING: &'static [ResultKind] = &[ResultKind::String];
    /// `[Command, String]`, used when a leading argument may itself be a command.
    pub const COMMAND_OR_STRING: &'static [ResultKind] = &[ResultKind::Command, ResultKind::String];
    /// Every built-in kind, string first.
    pub const ALL: &'static [ResultKind] = &[
        ResultKind::String,
        ResultKind::Empty,
        ResultKind::Command,
        ResultKind::Enumerable,
    ];

    /// Parse the lowercase name used by [`fmt::Display`]. Extension kinds are not parseable.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(ResultKind::String),
            "empty" => Some(ResultKind::Empty),
            "command" => Some(ResultKind::Command),
            "enumerable" => Some(ResultKind::Enumerable),
            _ => None,
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultKind::String => write!(f, "string"),
            ResultKind::Empty => write!(f, "empty"),
            ResultKind::Command => write!(f, "command"),
            ResultKind::Enumerable => write!(f, "enumerable"),
            ResultKind::Extension(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_from_name_agree() {
        for kind in ResultKind::ALL {
            assert_eq!(ResultKind::from_name(&kind.to_string()), Some(*kind));
        }
    }

    #[test]
    fn extension_kinds_compare_by_name() {
        assert_eq!(ResultKind::Extension("json"), ResultKind::Extension("json"));
        assert_ne!(ResultKind::Extension("json"), ResultKind::Extension("data"));
        assert_eq!(ResultKind::from_name("json"), None);
    }
}
