//! S-expression rendering of the AST.
//!
//! Used by the `.test` parser cases and the REPL's `/ast` mode:
//!
//! ```text
//! !foo (!bar baz) qux   =>   (cmd "foo" (cmd "bar" "baz") "qux")
//! ```

use super::AstNode;

/// Render a node as an s-expression.
pub fn format(node: &AstNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &AstNode) {
    match node {
        AstNode::Command(cmd) => {
            out.push_str("(cmd");
            for param in &cmd.parameters {
                out.push(' ');
                write_node(out, param);
            }
            out.push(')');
        }
        AstNode::Value(val) => out.push_str(&format!("{:?}", val.text)),
        AstNode::Error(err) => out.push_str(&format!("(error {:?})", err.description)),
    }
}
