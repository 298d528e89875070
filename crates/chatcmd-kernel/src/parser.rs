//! Parser for chat command requests.
//!
//! Transforms a raw text line into an [`AstNode`] tree. The parser is a small
//! state machine over the characters of the request:
//!
//! ```text
//! COMMAND     := '!'? ARGUMENT*
//! ARGUMENT    := '(' '!' COMMAND | FREESTRING | QUOTESTRING
//! FREESTRING  := runs until whitespace, ')' or "(!"
//! QUOTESTRING := '"' ... '"'   (only \" is unescaped)
//! ```
//!
//! Parsing never fails. Malformed input degrades instead:
//! - an unterminated quote reads to the end of the line
//! - a `)` that closes the outermost command ends parsing, the rest of the line is dropped
//! - a `(` that is not followed by `!` is an ordinary character

use std::sync::Arc;

use crate::ast::{AstCommand, AstNode, AstValue, Span};

/// Prefix that marks a command.
pub const COMMAND_CHAR: char = '!';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildStatus {
    ParseCommand,
    SelectParam,
    ParseFreeString,
    ParseQuotedString,
    End,
}

/// A command whose closing `)` has not been seen yet.
struct OpenCommand {
    start: usize,
    parameters: Vec<AstNode>,
}

/// Character cursor over the request.
struct Cursor {
    chars: Vec<char>,
    index: usize,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.index + 1).copied()
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn skip_whitespace(&mut self) {
        while self.current().is_some_and(char::is_whitespace) {
            self.index += 1;
        }
    }

    /// True on `(!`, the start of a nested command.
    fn at_nested_command(&self) -> bool {
        self.current() == Some('(') && self.peek_next() == Some(COMMAND_CHAR)
    }
}

/// Parse a request into its command tree.
///
/// Always returns an [`AstNode::Command`], even for empty input.
pub fn parse(request: &str) -> AstNode {
    let source: Arc<str> = Arc::from(request);
    let mut cursor = Cursor::new(request);
    let mut stack: Vec<OpenCommand> = Vec::new();
    let mut root: Option<AstCommand> = None;
    let mut status = BuildStatus::ParseCommand;

    loop {
        match status {
            BuildStatus::ParseCommand => {
                let start = cursor.index;
                if cursor.current() == Some(COMMAND_CHAR) {
                    cursor.advance();
                }
                stack.push(OpenCommand {
                    start,
                    parameters: Vec::new(),
                });
                status = BuildStatus::SelectParam;
            }

            BuildStatus::SelectParam => {
                cursor.skip_whitespace();
                status = match cursor.current() {
                    None => BuildStatus::End,
                    Some('"') => BuildStatus::ParseQuotedString,
                    Some('(') if cursor.at_nested_command() => {
                        cursor.advance();
                        BuildStatus::ParseCommand
                    }
                    Some(')') => {
                        let end = cursor.index;
                        cursor.advance();
                        close_command(&mut stack, &mut root, &source, end);
                        if stack.is_empty() {
                            BuildStatus::End
                        } else {
                            BuildStatus::SelectParam
                        }
                    }
                    Some(_) => BuildStatus::ParseFreeString,
                };
            }

            BuildStatus::ParseFreeString => {
                let start = cursor.index;
                let mut text = String::new();
                while let Some(c) = cursor.current() {
                    if c == ')' || c.is_whitespace() || cursor.at_nested_command() {
                        break;
                    }
                    text.push(c);
                    cursor.advance();
                }
                let span = Span::new(source.clone(), start, cursor.index - start);
                push_param(&mut stack, AstNode::Value(AstValue { text, span }));
                status = BuildStatus::SelectParam;
            }

            BuildStatus::ParseQuotedString => {
                // Opening quote
                cursor.advance();
                let start = cursor.index;
                let mut text = String::new();
                let mut escaped = false;
                let mut end = cursor.len();
                while let Some(c) = cursor.current() {
                    match c {
                        '\\' => escaped = true,
                        '"' if escaped => {
                            text.pop();
                            escaped = false;
                        }
                        '"' => {
                            end = cursor.index;
                            cursor.advance();
                            break;
                        }
                        _ => escaped = false,
                    }
                    text.push(c);
                    cursor.advance();
                }
                let span = Span::new(source.clone(), start, end - start);
                push_param(&mut stack, AstNode::Value(AstValue { text, span }));
                status = BuildStatus::SelectParam;
            }

            BuildStatus::End => break,
        }
    }

    // Commands left open at the end of input close there.
    while !stack.is_empty() {
        close_command(&mut stack, &mut root, &source, cursor.len());
    }

    let root = root.unwrap_or_else(|| AstCommand {
        parameters: Vec::new(),
        span: Span::new(source, 0, 0),
    });
    AstNode::Command(root)
}

fn push_param(stack: &mut [OpenCommand], node: AstNode) {
    if let Some(open) = stack.last_mut() {
        open.parameters.push(node);
    }
}

/// Close the innermost open command and attach it to its parent, or make it the root.
fn close_command(
    stack: &mut Vec<OpenCommand>,
    root: &mut Option<AstCommand>,
    source: &Arc<str>,
    end: usize,
) {
    let Some(open) = stack.pop() else {
        return;
    };
    let cmd = AstCommand {
        parameters: open.parameters,
        span: Span::new(source.clone(), open.start, end.saturating_sub(open.start)),
    };
    match stack.last_mut() {
        Some(parent) => parent.parameters.push(AstNode::Command(cmd)),
        None => *root = Some(cmd),
    }
}
