//! Interpreter state for chat commands.
//!
//! - `result`: the negotiated [`CommandResult`]
//! - `scope`: argument frames of running alias calls
//! - `budget`: the complexity budget that bounds alias expansion

mod budget;
mod result;
mod scope;

pub use budget::{ComplexityBudget, TokenBudget, Unlimited};
pub use result::{format_kinds, CommandResult};
pub use scope::ArgumentFrames;
