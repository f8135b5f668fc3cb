// This module implements the dispatcher for buffer based strategies. Generator walks the
// IR with an exhaustive match: multi joins the fragments of its children with "; ",
// code is passed through verbatim, static and dynamic become appends to the active buffer
// (dynamic values are always coerced with to_s first), and capture opens a deeper buffer,
// compiles its body into it and binds the finalized value to the capture's name. The
// active buffer is derived from the Scope threaded through the recursion, so a capture can
// never leak its depth into sibling code. render() wraps the walk in the strategy's create
// and finalize, or takes the strategy's single-node fast path when one applies.

//! Buffer dispatcher.
//!
//! ```text
//! render(root):
//!     fast_path(root)                       -- lone static/dynamic only
//!  or create(_buf); compile(root); finalize(_buf)
//!
//! compile(capture name body) at depth d:
//!     create(_buf{d+1}); compile(body) at d+1; name = finalize(_buf{d+1})
//! ```

use log::{debug, trace};

use super::error::{CompileError, CompileResult};
use super::ir::Node;
use super::session::{is_buffer_name, RenderSession, Scope};
use super::strategy::{is_identifier, BufferStrategy, Renderer};

/// Separator between emitted statements.
pub const STATEMENT_SEPARATOR: &str = "; ";

pub(crate) fn check_capture_name(name: &str) -> CompileResult<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(CompileError::MalformedNode {
            tag: "capture",
            reason: format!("{name:?} is not a valid local variable name"),
        })
    }
}

/// Like [`check_capture_name`], also rejecting the buffer variables of `base`.
fn check_capture_target(name: &str, base: &str) -> CompileResult<()> {
    check_capture_name(name)?;
    if is_buffer_name(base, name) {
        return Err(CompileError::MalformedNode {
            tag: "capture",
            reason: format!("{name:?} would overwrite a `{base}` buffer"),
        });
    }
    Ok(())
}

/// Join fragments, dropping empty ones.
fn join_fragments<I>(fragments: I) -> String
where
    I: IntoIterator<Item = String>,
{
    fragments
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(STATEMENT_SEPARATOR)
}

/// Compiles IR through a [`BufferStrategy`].
#[derive(Debug, Clone)]
pub struct Generator<S: BufferStrategy> {
    strategy: S,
    fast_path: bool,
}

impl<S: BufferStrategy> Generator<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            fast_path: true,
        }
    }

    /// Enable or disable the strategy's single-node shortcut.
    pub fn with_fast_path(mut self, enabled: bool) -> Self {
        self.fast_path = enabled;
        self
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Compile `node` against the buffer active at `scope`.
    pub fn compile(
        &self,
        node: &Node,
        scope: Scope,
        session: &mut RenderSession,
    ) -> CompileResult<String> {
        trace!("compile {} at depth {}", node.tag(), scope.depth());
        match node {
            Node::Multi(children) => {
                session.record_multi();
                let mut fragments = Vec::with_capacity(children.len());
                for child in children {
                    fragments.push(self.compile(child, scope, session)?);
                }
                Ok(join_fragments(fragments))
            }
            Node::Static(text) => {
                session.record_static();
                let buffer = scope.buffer_name(self.strategy.buffer());
                Ok(self.strategy.append(&buffer, &self.strategy.static_value(text)))
            }
            Node::Dynamic(code) => {
                session.record_dynamic();
                let buffer = scope.buffer_name(self.strategy.buffer());
                Ok(self.strategy.append(&buffer, &self.strategy.dynamic_value(code)))
            }
            Node::Code(code) => {
                session.record_code();
                Ok(code.clone())
            }
            Node::Capture { name, body } => {
                check_capture_target(name, self.strategy.buffer())?;
                let inner = scope.nested();
                session.enter_capture(inner);
                let buffer = inner.buffer_name(self.strategy.buffer());
                let create = self.strategy.create(&buffer, inner);
                let body = self.compile(body, inner, session)?;
                let bind = format!("{name} = {}", self.strategy.finalize(&buffer));
                Ok(join_fragments([create, body, bind]))
            }
        }
    }
}

impl<S: BufferStrategy> Renderer for Generator<S> {
    fn name(&self) -> &'static str {
        self.strategy.name()
    }

    fn render_in(&self, root: &Node, session: &mut RenderSession) -> CompileResult<String> {
        let scope = Scope::root();
        let buffer = scope.buffer_name(self.strategy.buffer());

        if self.fast_path {
            if let Some(source) = self.strategy.fast_path(root, &buffer) {
                match root {
                    Node::Static(_) => session.record_static(),
                    Node::Dynamic(_) => session.record_dynamic(),
                    _ => {}
                }
                session.record_fast_path();
                debug!("{}: rendered {} root via fast path", self.strategy.name(), root.tag());
                return Ok(source);
            }
        }

        let body = self.compile(root, scope, session)?;
        let source = join_fragments([
            self.strategy.create(&buffer, scope),
            body,
            self.strategy.finalize(&buffer),
        ]);
        debug!("{}: rendered {}", self.strategy.name(), session.stats());
        Ok(source)
    }
}
