// This module defines the template IR shared by the front-end and every code generation
// strategy. A template is a tree of exactly five node shapes: Multi (ordered
// concatenation), Static (literal text), Dynamic (an expression whose stringified value is
// output), Code (a statement run for side effects) and Capture (render a subtree into its
// own buffer and bind the result to a local). Embedded Ruby fragments are opaque strings
// and are never inspected. Nodes are immutable once built, so one tree can be rendered by
// any number of strategies. The Display impl prints the textual IR read by text_ir.

//! Template intermediate representation.

use std::fmt;

/// A node of the template IR.
///
/// The set of variants is closed: every strategy handles all five with an
/// exhaustive match, so an unknown tag can only show up while reading the
/// textual form (see [`crate::text_ir`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Children rendered left to right.
    Multi(Vec<Node>),
    /// Constant output text.
    Static(String),
    /// Expression whose value is stringified and output.
    Dynamic(String),
    /// Statement executed for its side effect only.
    Code(String),
    /// Render `body` in isolation and bind the result to `name`.
    Capture { name: String, body: Box<Node> },
}

impl Node {
    pub fn multi(children: impl IntoIterator<Item = Node>) -> Self {
        Node::Multi(children.into_iter().collect())
    }

    pub fn static_text(text: impl Into<String>) -> Self {
        Node::Static(text.into())
    }

    pub fn dynamic(code: impl Into<String>) -> Self {
        Node::Dynamic(code.into())
    }

    pub fn code(code: impl Into<String>) -> Self {
        Node::Code(code.into())
    }

    pub fn capture(name: impl Into<String>, body: Node) -> Self {
        Node::Capture {
            name: name.into(),
            body: Box::new(body),
        }
    }

    /// Tag name as written in the textual IR and in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Node::Multi(_) => "multi",
            Node::Static(_) => "static",
            Node::Dynamic(_) => "dynamic",
            Node::Code(_) => "code",
            Node::Capture { .. } => "capture",
        }
    }

    /// Maximum capture nesting below (and including) this node.
    pub fn depth(&self) -> usize {
        match self {
            Node::Multi(children) => children.iter().map(Node::depth).max().unwrap_or(0),
            Node::Capture { body, .. } => 1 + body.depth(),
            Node::Static(_) | Node::Dynamic(_) | Node::Code(_) => 0,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match self {
            Node::Multi(children) if children.is_empty() => write!(f, "{pad}(multi)"),
            Node::Multi(children) => {
                write!(f, "{pad}(multi")?;
                for child in children {
                    writeln!(f)?;
                    child.write_indented(f, indent + 1)?;
                }
                write!(f, ")")
            }
            Node::Static(text) => write!(f, "{pad}(static {})", quote(text)),
            Node::Dynamic(code) => write!(f, "{pad}(dynamic {})", quote(code)),
            Node::Code(code) => write!(f, "{pad}(code {})", quote(code)),
            Node::Capture { name, body } => {
                writeln!(f, "{pad}(capture {}", quote(name))?;
                body.write_indented(f, indent + 1)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Quote a payload for the textual IR.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
