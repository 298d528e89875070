//! Parser test file parser and runner.
//!
//! Format of `tests/parser/*.test`:
//!
//! ```text
//! # test: nested_command
//! # skip: optional reason
//! ---
//! !foo (!bar baz) qux
//! ---
//! (cmd "foo" (cmd "bar" "baz") "qux")
//! ===
//! ```
//!
//! The input is every line between the two `---` markers, joined with `\n`.

use chatcmd_kernel::ast::sexpr;
use chatcmd_kernel::parser::parse;

use crate::{TestResult, TestSummary};

/// A single parser test case.
#[derive(Debug, Clone)]
pub struct ParserTestCase {
    /// Test name from the `# test: name` line.
    pub name: String,
    /// Line number where the test starts (1-indexed).
    pub line_number: usize,
    pub input: String,
    /// Expected AST as an s-expression.
    pub expected: String,
    pub skip: Option<String>,
}

/// Parse the *.test file format into test cases.
pub fn parse_parser_tests(content: &str) -> Vec<ParserTestCase> {
    let lines: Vec<&str> = content.lines().collect();
    let mut cases = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(name) = lines[i].trim().strip_prefix("# test:") else {
            i += 1;
            continue;
        };
        let name = name.trim().to_string();
        let line_number = i + 1;
        i += 1;

        let mut skip = None;
        while i < lines.len() && lines[i].trim() != "---" {
            if let Some(reason) = lines[i].trim().strip_prefix("# skip:") {
                skip = Some(reason.trim().to_string());
            }
            i += 1;
        }
        i += 1;

        let mut input = Vec::new();
        while i < lines.len() && lines[i].trim() != "---" {
            input.push(lines[i]);
            i += 1;
        }
        i += 1;

        let mut expected = Vec::new();
        while i < lines.len() && lines[i].trim() != "===" {
            expected.push(lines[i]);
            i += 1;
        }
        i += 1;

        cases.push(ParserTestCase {
            name,
            line_number,
            input: input.join("\n"),
            expected: expected.join("\n").trim().to_string(),
            skip,
        });
    }

    cases
}

impl ParserTestCase {
    pub fn run(&self) -> TestResult {
        if let Some(reason) = &self.skip {
            return TestResult::Skip {
                reason: reason.clone(),
            };
        }
        let actual = sexpr::format(&parse(&self.input));
        if normalize_sexpr(&actual) == normalize_sexpr(&self.expected) {
            TestResult::Pass
        } else {
            TestResult::Fail {
                expected: self.expected.clone(),
                actual,
            }
        }
    }
}

/// Collapse whitespace runs so expectations may span lines.
fn normalize_sexpr(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run all parser test cases and return a summary.
pub fn run_parser_tests(cases: &[ParserTestCase]) -> TestSummary {
    let mut summary = TestSummary::new();
    for case in cases {
        summary.record(&case.name, case.line_number, case.run());
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# test: simple
---
!play song
---
(cmd "play" "song")
===

# test: later
# skip: not decided yet
---
!x
---
(cmd)
===
"#;

    #[test]
    fn parses_cases() {
        let cases = parse_parser_tests(SAMPLE);
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].name, "simple");
        assert_eq!(cases[0].line_number, 2);
        assert_eq!(cases[0].input, "!play song");
        assert_eq!(cases[0].expected, r#"(cmd "play" "song")"#);
        assert_eq!(cases[1].skip.as_deref(), Some("not decided yet"));
    }

    #[test]
    fn runs_cases() {
        let summary = run_parser_tests(&parse_parser_tests(SAMPLE));
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(summary.all_passed());
    }

    #[test]
    fn reports_mismatch() {
        let case = ParserTestCase {
            name: "wrong".into(),
            line_number: 1,
            input: "!a b".into(),
            expected: r#"(cmd "a")"#.into(),
            skip: None,
        };
        assert!(case.run().is_fail());
    }
}
