// This module defines the seams between the dispatcher and concrete code generation
// strategies. BufferStrategy is the three operation buffer protocol (create, append,
// finalize) plus the literal/coercion helpers used for static and dynamic nodes and an
// optional single-node fast path. InlineStrategy is the separate capability set for
// strategies that map nodes straight to markup with no buffer at all. Renderer is the
// object safe face both kinds present to callers that pick a strategy at run time.
// StrategyOptions carries the recognized configuration; strategies validate it when they
// are constructed so misconfiguration surfaces before any IR is compiled.

//! Strategy traits and options.

use super::error::{CompileResult, ConfigError};
use super::ir::Node;
use super::literal::ruby_string_literal;
use super::session::{RenderSession, RenderStats, Scope};

/// Recognized strategy options.
///
/// Strategies pick the fields they understand and warn about the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOptions {
    /// Base name of the buffer variable. Each strategy has its own default.
    pub buffer_name: Option<String>,
    /// Joined-list: freeze the finalized string.
    pub freeze_static: bool,
    /// Allow the single-node shortcut where the strategy has one.
    pub fast_path: bool,
    /// Safe buffer: constructor of the framework buffer.
    pub buffer_class: Option<String>,
    /// Safe buffer: reuse `stream_buffer` for the outermost buffer.
    pub streaming: bool,
    /// Safe buffer: expression naming the buffer handed in by the caller.
    pub stream_buffer: Option<String>,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            buffer_name: None,
            freeze_static: false,
            fast_path: true,
            buffer_class: None,
            streaming: false,
            stream_buffer: None,
        }
    }
}

impl StrategyOptions {
    pub fn with_buffer(mut self, name: impl Into<String>) -> Self {
        self.buffer_name = Some(name.into());
        self
    }

    pub fn with_freeze_static(mut self, freeze: bool) -> Self {
        self.freeze_static = freeze;
        self
    }

    pub fn with_fast_path(mut self, enabled: bool) -> Self {
        self.fast_path = enabled;
        self
    }

    pub fn with_buffer_class(mut self, class: impl Into<String>) -> Self {
        self.buffer_class = Some(class.into());
        self
    }

    pub fn with_streaming(mut self, stream_buffer: impl Into<String>) -> Self {
        self.streaming = true;
        self.stream_buffer = Some(stream_buffer.into());
        self
    }

    /// Validated buffer name, falling back to `default`.
    pub(crate) fn buffer_or(&self, default: &str) -> Result<String, ConfigError> {
        match &self.buffer_name {
            Some(name) => {
                check_identifier("buffer_name", name)?;
                Ok(name.clone())
            }
            None => Ok(default.to_string()),
        }
    }

    /// Log options that `strategy` has no use for.
    pub(crate) fn warn_unused(&self, strategy: &str, used: &[&str]) {
        let set = [
            ("freeze_static", self.freeze_static),
            ("buffer_class", self.buffer_class.is_some()),
            ("streaming", self.streaming || self.stream_buffer.is_some()),
            ("buffer_name", self.buffer_name.is_some()),
        ];
        for (option, is_set) in set {
            if is_set && !used.contains(&option) {
                log::warn!("option `{option}` is ignored by the {strategy} strategy");
            }
        }
    }
}

/// Reserved words that cannot be assigned to as locals.
const RUBY_KEYWORDS: &[&str] = &[
    "__ENCODING__", "__FILE__", "__LINE__", "alias", "and", "begin", "break", "case", "class",
    "def", "do", "else", "elsif", "end", "ensure", "false", "for", "if", "in", "module", "next",
    "nil", "not", "or", "redo", "rescue", "retry", "return", "self", "super", "then", "true",
    "undef", "unless", "until", "when", "while", "yield",
];

/// Whether `name` can name a Ruby local or instance variable.
pub fn is_identifier(name: &str) -> bool {
    let (bare, ivar) = match name.strip_prefix('@') {
        Some(bare) => (bare, true),
        None => (name, false),
    };
    let mut chars = bare.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_lowercase() => {}
        _ => return false,
    }
    // `@end` is a fine instance variable; a bare `end` is not a local.
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        && (ivar || !RUBY_KEYWORDS.contains(&bare))
}

pub(crate) fn check_identifier(option: &'static str, value: &str) -> Result<(), ConfigError> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            option,
            value: value.to_string(),
        })
    }
}

/// The buffer protocol.
///
/// A strategy decides how output is accumulated at run time; the
/// [`Generator`](super::compiler::Generator) decides what gets accumulated.
/// Every method returns Ruby source text and never fails: options were
/// validated when the strategy was built.
pub trait BufferStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Base name of the buffer variable.
    fn buffer(&self) -> &str;

    /// Statement initialising `buffer` to its empty state.
    fn create(&self, buffer: &str, scope: Scope) -> String;

    /// Statement adding the value of `value` to `buffer`.
    fn append(&self, buffer: &str, value: &str) -> String;

    /// Expression producing the final value of `buffer`.
    fn finalize(&self, buffer: &str) -> String;

    /// Expression for constant output text.
    fn static_value(&self, text: &str) -> String {
        ruby_string_literal(text)
    }

    /// Expression for the stringified value of `code`.
    fn dynamic_value(&self, code: &str) -> String {
        format!("({code}).to_s")
    }

    /// Direct assignment for a lone `static` or `dynamic` root.
    ///
    /// Must evaluate to the same value as the create/append/finalize
    /// sequence. Strategies without a shortcut keep the default.
    fn fast_path(&self, _root: &Node, _buffer: &str) -> Option<String> {
        None
    }
}

/// Strategies that map nodes straight to text without any buffer.
pub trait InlineStrategy {
    fn name(&self) -> &'static str;

    fn on_static(&self, text: &str) -> String;

    fn on_dynamic(&self, code: &str) -> String;

    fn on_code(&self, code: &str) -> String;

    fn on_capture(&self, name: &str, body: String) -> String;

    /// Map `node` to text. `multi` is plain concatenation.
    fn compile(&self, node: &Node) -> CompileResult<String> {
        Ok(match node {
            Node::Multi(children) => {
                let mut out = String::new();
                for child in children {
                    out.push_str(&self.compile(child)?);
                }
                out
            }
            Node::Static(text) => self.on_static(text),
            Node::Dynamic(code) => self.on_dynamic(code),
            Node::Code(code) => self.on_code(code),
            Node::Capture { name, body } => {
                super::compiler::check_capture_name(name)?;
                let body = self.compile(body)?;
                self.on_capture(name, body)
            }
        })
    }
}

/// A configured strategy ready to turn IR into source.
pub trait Renderer {
    fn name(&self) -> &'static str;

    /// Render `root`, recording bookkeeping into `session`.
    fn render_in(&self, root: &Node, session: &mut RenderSession) -> CompileResult<String>;

    /// Render `root` into a complete program.
    fn render(&self, root: &Node) -> CompileResult<String> {
        self.render_in(root, &mut RenderSession::new())
    }

    /// Render `root`, also returning the stats of the run.
    fn render_with_stats(&self, root: &Node) -> CompileResult<(String, RenderStats)> {
        let mut session = RenderSession::new();
        let source = self.render_in(root, &mut session)?;
        Ok((source, session.into_stats()))
    }
}
