//! chatcmd-types: pure data types shared by the chatcmd kernel and its collaborators.
//!
//! Nothing in here executes commands. The types describe:
//!
//! - **Result kinds**: the shapes a caller can accept from a command (`ResultKind`)
//! - **Errors**: everything that can go wrong while resolving or running a command (`CommandError`)
//! - **Metadata**: what the registration phase knows about a command (`CommandMeta`, `Usage`)

mod error;
mod kind;
mod meta;

pub use error::{BudgetExhausted, CommandError, ErrorReason};
pub use kind::ResultKind;
pub use meta::{CommandMeta, Usage};
