//! Complexity budget.
//!
//! Every alias indirection costs one token. A request that expands more
//! aliases than its budget allows fails with [`BudgetExhausted`] instead of
//! recursing forever.

use chatcmd_types::BudgetExhausted;

/// Source of complexity tokens for one invocation.
pub trait ComplexityBudget {
    /// Take `tokens` from the budget.
    fn consume(&mut self, tokens: u32) -> Result<(), BudgetExhausted>;

    /// Tokens left, if the budget is bounded.
    fn remaining(&self) -> Option<u32> {
        None
    }
}

/// A fixed number of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    remaining: u32,
}

impl TokenBudget {
    pub fn new(tokens: u32) -> Self {
        Self { remaining: tokens }
    }
}

impl ComplexityBudget for TokenBudget {
    fn consume(&mut self, tokens: u32) -> Result<(), BudgetExhausted> {
        self.remaining = self.remaining.checked_sub(tokens).ok_or(BudgetExhausted)?;
        Ok(())
    }

    fn remaining(&self) -> Option<u32> {
        Some(self.remaining)
    }
}

/// No limit at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl ComplexityBudget for Unlimited {
    fn consume(&mut self, _tokens: u32) -> Result<(), BudgetExhausted> {
        Ok(())
    }
}
