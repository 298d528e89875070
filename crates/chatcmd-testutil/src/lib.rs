//! Test utilities for chatcmd.
//!
//! Provides the parser and runner for the `tests/parser/*.test` files: chat
//! lines with the expected AST as an s-expression.

pub mod parser;

use std::fmt;

/// The result of running a single test case.
#[derive(Debug, Clone)]
pub enum TestResult {
    Pass,
    /// Expected vs actual mismatch.
    Fail { expected: String, actual: String },
    Skip { reason: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }
}

/// Summary of running multiple test cases.
#[derive(Debug, Default)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<TestFailure>,
}

/// A single test failure with context.
#[derive(Debug, Clone)]
pub struct TestFailure {
    pub name: String,
    pub line: usize,
    pub result: TestResult,
}

impl TestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, line: usize, result: TestResult) {
        match result {
            TestResult::Pass => self.passed += 1,
            TestResult::Skip { .. } => self.skipped += 1,
            TestResult::Fail { .. } => {
                self.failed += 1;
                self.failures.push(TestFailure {
                    name: name.into(),
                    line,
                    result,
                });
            }
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}", "=".repeat(60))?;
        writeln!(
            f,
            "{} total: {} passed, {} failed, {} skipped",
            self.total(),
            self.passed,
            self.failed,
            self.skipped
        )?;
        for failure in &self.failures {
            writeln!(f, "\n  {} (line {})", failure.name, failure.line)?;
            if let TestResult::Fail { expected, actual } = &failure.result {
                writeln!(f, "    expected: {expected}")?;
                writeln!(f, "    actual:   {actual}")?;
            }
        }
        writeln!(f, "{}", "=".repeat(60))
    }
}
