//! Command errors.

use serde::{Deserialize, Serialize};

/// The complexity budget of the current invocation ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the command is too complex to execute")]
pub struct BudgetExhausted;

/// Everything that can go wrong while resolving or running a command.
///
/// Every variant renders as user-facing text through `Display`; callers that
/// need to branch (rights layers, web APIs) use [`CommandError::reason`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// More than one command name survived the fuzzy filter.
    #[error("ambiguous command, possible names: {}", .candidates.join(", "))]
    AmbiguousName { candidates: Vec<String> },

    /// No command could be found for a name.
    #[error("no command found for \"{name}\"")]
    NameNotFound { name: String },

    /// A call did not supply enough arguments.
    #[error("{0}")]
    Arity(String),

    /// An argument could not be converted to the parameter type.
    #[error("could not convert \"{value}\" to {target}")]
    TypeCoercion { value: String, target: String },

    /// A numeric argument does not fit into the parameter type.
    #[error("the number \"{value}\" is too big")]
    NumberTooBig { value: String },

    /// Every overload of a command failed.
    #[error("no matching function overload could be found")]
    NoMatchingOverload,

    /// The command cannot produce any of the requested kinds.
    #[error("no matching return type for {0}")]
    NoMatchingReturnKind(String),

    /// A native command body failed.
    #[error("{0}")]
    Native(String),

    /// The complexity budget ran out (alias expansion).
    #[error(transparent)]
    BudgetExhausted(#[from] BudgetExhausted),

    /// A command already occupies the path.
    #[error("a command already exists at \"{0}\"")]
    DuplicateCommand(String),

    /// The path is not a valid command namespace or does not fit the tree.
    #[error("invalid command path \"{path}\": {message}")]
    InvalidPath { path: String, message: String },

    /// A broken invariant inside the kernel.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`CommandError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    AmbiguousName,
    NameNotFound,
    ArityError,
    TypeCoercionError,
    NoMatchingOverload,
    NoMatchingReturnKind,
    NativeInvocationError,
    BudgetExhausted,
    Registration,
    Internal,
}

impl CommandError {
    /// Shorthand for a native failure with a message.
    pub fn native(message: impl Into<String>) -> Self {
        CommandError::Native(message.into())
    }

    /// Shorthand for an arity failure with a message.
    pub fn arity(message: impl Into<String>) -> Self {
        CommandError::Arity(message.into())
    }

    /// The class of this error.
    pub fn reason(&self) -> ErrorReason {
        match self {
            CommandError::AmbiguousName { .. } => ErrorReason::AmbiguousName,
            CommandError::NameNotFound { .. } => ErrorReason::NameNotFound,
            CommandError::Arity(_) => ErrorReason::ArityError,
            CommandError::TypeCoercion { .. } | CommandError::NumberTooBig { .. } => {
                ErrorReason::TypeCoercionError
            }
            CommandError::NoMatchingOverload => ErrorReason::NoMatchingOverload,
            CommandError::NoMatchingReturnKind(_) => ErrorReason::NoMatchingReturnKind,
            CommandError::Native(_) => ErrorReason::NativeInvocationError,
            CommandError::BudgetExhausted(_) => ErrorReason::BudgetExhausted,
            CommandError::DuplicateCommand(_) | CommandError::InvalidPath { .. } => {
                ErrorReason::Registration
            }
            CommandError::Internal(_) => ErrorReason::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_name_lists_candidates() {
        let err = CommandError::AmbiguousName {
            candidates: vec!["pla".into(), "ply".into()],
        };
        assert_eq!(err.to_string(), "ambiguous command, possible names: pla, ply");
        assert_eq!(err.reason(), ErrorReason::AmbiguousName);
    }

    #[test]
    fn budget_exhaustion_converts() {
        let err: CommandError = BudgetExhausted.into();
        assert_eq!(err.reason(), ErrorReason::BudgetExhausted);
        assert_eq!(err.to_string(), "the command is too complex to execute");
    }

    #[test]
    fn coercion_errors_share_a_reason() {
        let a = CommandError::TypeCoercion {
            value: "x".into(),
            target: "int".into(),
        };
        let b = CommandError::NumberTooBig {
            value: "99999999999999999999".into(),
        };
        assert_eq!(a.reason(), b.reason());
    }

    #[test]
    fn reason_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorReason::NoMatchingReturnKind).unwrap();
        assert_eq!(json, "\"no_matching_return_kind\"");
    }
}
