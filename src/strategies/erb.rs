//! Inline ERB markup.
//!
//! Maps nodes straight to ERB tags; there is no buffer and no
//! preamble. Static text is copied verbatim.

use log::debug;

use crate::core::{CompileResult, InlineStrategy, Node, RenderSession, Renderer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Erb;

impl Erb {
    pub fn new() -> Self {
        Self
    }
}

impl InlineStrategy for Erb {
    fn name(&self) -> &'static str {
        "erb"
    }

    fn on_static(&self, text: &str) -> String {
        text.to_string()
    }

    fn on_dynamic(&self, code: &str) -> String {
        format!("<%= {code} %>")
    }

    fn on_code(&self, code: &str) -> String {
        format!("<% {code} %>")
    }

    fn on_capture(&self, name: &str, body: String) -> String {
        format!("{}{body}{}", self.on_code(&format!("{name} = capture do")), self.on_code("end"))
    }
}

impl Renderer for Erb {
    fn name(&self) -> &'static str {
        InlineStrategy::name(self)
    }

    fn render_in(&self, root: &Node, session: &mut RenderSession) -> CompileResult<String> {
        let out = self.compile(root)?;
        session.record_tree(root);
        debug!("erb: rendered {} root into {} bytes", root.tag(), out.len());
        Ok(out)
    }
}
