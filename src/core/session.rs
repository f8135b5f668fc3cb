// This module holds the bookkeeping of a single render. Scope is the buffer depth as an
// immutable value: the dispatcher passes it down the recursion and a capture compiles its
// body with scope.nested(), so the enclosing scope is restored simply by returning. The
// active buffer variable is derived from the depth alone (base name at depth 0, base name
// plus the decimal depth below that), which keeps an outer buffer and its nested capture
// buffers distinct at any depth. RenderSession collects RenderStats for one render call and
// is never shared between calls, so concurrent renders need no locking.

//! Per-render compile state.

use std::borrow::Cow;
use std::fmt;

use super::ir::Node;

/// Buffer nesting depth at a point of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scope {
    depth: usize,
}

impl Scope {
    /// The outermost buffer.
    pub const fn root() -> Self {
        Self { depth: 0 }
    }

    /// Scope one capture level deeper.
    pub const fn nested(self) -> Self {
        Self {
            depth: self.depth + 1,
        }
    }

    pub const fn depth(self) -> usize {
        self.depth
    }

    pub const fn is_root(self) -> bool {
        self.depth == 0
    }

    /// Name of the active buffer variable for `base` at this depth.
    pub fn buffer_name(self, base: &str) -> Cow<'_, str> {
        if self.depth == 0 {
            Cow::Borrowed(base)
        } else {
            Cow::Owned(format!("{base}{}", self.depth))
        }
    }
}

/// Whether `name` is `base` or `base` followed by a depth, i.e. a name
/// some buffer of the render may use.
pub fn is_buffer_name(base: &str, name: &str) -> bool {
    match name.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Counters gathered while rendering one tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderStats {
    pub static_nodes: usize,
    pub dynamic_nodes: usize,
    pub code_nodes: usize,
    pub capture_nodes: usize,
    pub multi_nodes: usize,
    /// Deepest buffer depth used.
    pub max_depth: usize,
    /// Whether the strategy's single-node shortcut produced the output.
    pub fast_path: bool,
}

impl RenderStats {
    pub fn total_nodes(&self) -> usize {
        self.static_nodes
            + self.dynamic_nodes
            + self.code_nodes
            + self.capture_nodes
            + self.multi_nodes
    }
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nodes: {} (multi {}, static {}, dynamic {}, code {}, capture {}), \
             max depth: {}, fast path: {}",
            self.total_nodes(),
            self.multi_nodes,
            self.static_nodes,
            self.dynamic_nodes,
            self.code_nodes,
            self.capture_nodes,
            self.max_depth,
            self.fast_path
        )
    }
}

/// State owned by one render invocation.
#[derive(Debug, Default)]
pub struct RenderSession {
    stats: RenderStats,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    pub fn into_stats(self) -> RenderStats {
        self.stats
    }

    pub(crate) fn record_multi(&mut self) {
        self.stats.multi_nodes += 1;
    }

    pub(crate) fn record_static(&mut self) {
        self.stats.static_nodes += 1;
    }

    pub(crate) fn record_dynamic(&mut self) {
        self.stats.dynamic_nodes += 1;
    }

    pub(crate) fn record_code(&mut self) {
        self.stats.code_nodes += 1;
    }

    pub(crate) fn enter_capture(&mut self, scope: Scope) {
        self.stats.capture_nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(scope.depth());
    }

    pub(crate) fn record_fast_path(&mut self) {
        self.stats.fast_path = true;
    }

    /// Count a whole tree, for strategies that do not walk it node by node.
    pub(crate) fn record_tree(&mut self, node: &Node) {
        self.record_node(node, Scope::root());
    }

    fn record_node(&mut self, node: &Node, scope: Scope) {
        match node {
            Node::Multi(children) => {
                self.record_multi();
                for child in children {
                    self.record_node(child, scope);
                }
            }
            Node::Static(_) => self.record_static(),
            Node::Dynamic(_) => self.record_dynamic(),
            Node::Code(_) => self.record_code(),
            Node::Capture { body, .. } => {
                let inner = scope.nested();
                self.enter_capture(inner);
                self.record_node(body, inner);
            }
        }
    }
}
