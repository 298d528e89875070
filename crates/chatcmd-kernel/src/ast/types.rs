//! AST node types.
//!
//! The parser produces a tree of [`AstNode`]s. Every node remembers where it
//! came from so diagnostics can point at the offending part of the line.

use std::fmt;
use std::sync::Arc;

/// Location of a node inside the request it was parsed from.
///
/// `position` and `length` count characters, not bytes, so the caret line of
/// a diagnostic lines up with the text above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub source: Arc<str>,
    pub position: usize,
    pub length: usize,
}

impl Span {
    pub fn new(source: Arc<str>, position: usize, length: usize) -> Self {
        Self {
            source,
            position,
            length,
        }
    }

    /// The spanned characters.
    pub fn text(&self) -> String {
        self.source
            .chars()
            .skip(self.position)
            .take(self.length)
            .collect()
    }
}

/// A node of a parsed request.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// A call: `!name arg1 (!nested) "quoted"`.
    Command(AstCommand),
    /// A free or quoted string.
    Value(AstValue),
    /// A diagnostic attached to a location. Never produced by the parser.
    Error(AstError),
}

/// A call with its parameters. The first parameter names the command.
#[derive(Debug, Clone, PartialEq)]
pub struct AstCommand {
    pub parameters: Vec<AstNode>,
    pub span: Span,
}

/// A literal string argument.
#[derive(Debug, Clone, PartialEq)]
pub struct AstValue {
    pub text: String,
    pub span: Span,
}

/// A diagnostic pointing into the request.
#[derive(Debug, Clone, PartialEq)]
pub struct AstError {
    pub description: String,
    pub span: Span,
}

impl AstNode {
    pub fn span(&self) -> &Span {
        match self {
            AstNode::Command(cmd) => &cmd.span,
            AstNode::Value(val) => &val.span,
            AstNode::Error(err) => &err.span,
        }
    }

    /// The command node, if this is one.
    pub fn as_command(&self) -> Option<&AstCommand> {
        match self {
            AstNode::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    /// The literal text, if this is a value.
    pub fn as_value(&self) -> Option<&str> {
        match self {
            AstNode::Value(val) => Some(&val.text),
            _ => None,
        }
    }
}

impl AstError {
    /// A diagnostic covering the same text as `node`.
    pub fn at(node: &AstNode, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            span: node.span().clone(),
        }
    }

    pub fn new(
        source: impl Into<Arc<str>>,
        position: usize,
        length: usize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            span: Span::new(source.into(), position, length),
        }
    }
}

/// Caret diagnostic:
///
/// ```text
/// !play (!volume x
///               ~~^
/// Error: could not convert "x" to int
/// ```
impl fmt::Display for AstError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.span.source)?;
        match self.span.position {
            0 => {}
            1 => write!(f, ".")?,
            n => write!(f, "{}", " ".repeat(n))?,
        }
        writeln!(f, "{}^", "~".repeat(self.span.length))?;
        writeln!(f, "Error: {}", self.description)
    }
}
