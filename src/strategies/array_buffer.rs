//! Joined-list strategy.
//!
//! Accumulates into an array like [`Array`](super::Array) but returns the
//! joined string, optionally frozen. A lone `static` or `dynamic` root is
//! assigned directly instead.

use crate::core::{BufferStrategy, ConfigError, Node, Scope, StrategyOptions};

use super::Array;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayBuffer {
    list: Array,
    freeze: bool,
}

impl ArrayBuffer {
    pub fn new(options: &StrategyOptions) -> Result<Self, ConfigError> {
        options.warn_unused("array-buffer", &["buffer_name", "freeze_static"]);
        Ok(Self {
            list: Array::new(&StrategyOptions {
                buffer_name: options.buffer_name.clone(),
                ..StrategyOptions::default()
            })?,
            freeze: options.freeze_static,
        })
    }

    fn frozen(&self, expr: String) -> String {
        if self.freeze {
            format!("{expr}.freeze")
        } else {
            expr
        }
    }
}

impl BufferStrategy for ArrayBuffer {
    fn name(&self) -> &'static str {
        "array-buffer"
    }

    fn buffer(&self) -> &str {
        self.list.buffer()
    }

    fn create(&self, buffer: &str, scope: Scope) -> String {
        self.list.create(buffer, scope)
    }

    fn append(&self, buffer: &str, value: &str) -> String {
        self.list.append(buffer, value)
    }

    fn finalize(&self, buffer: &str) -> String {
        self.frozen(format!("{buffer}.join(\"\")"))
    }

    fn fast_path(&self, root: &Node, buffer: &str) -> Option<String> {
        let value = match root {
            Node::Static(text) => self.static_value(text),
            Node::Dynamic(code) => self.dynamic_value(code),
            _ => return None,
        };
        Some(format!("{buffer} = {}", self.frozen(value)))
    }
}
