//! Abstract Syntax Tree types for chat commands.
//!
//! This module provides:
//! - AST type definitions (`types` module, re-exported at this level)
//! - S-expression formatter for test cases (`sexpr` module)

mod types;
pub mod sexpr;

pub use types::*;
