//! Mutable-string strategy.

use crate::core::{BufferStrategy, ConfigError, Scope, StrategyOptions};

use super::Array;

/// Appends in place to a single Ruby `String`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringBuffer {
    buffer: String,
}

impl StringBuffer {
    pub fn new(options: &StrategyOptions) -> Result<Self, ConfigError> {
        options.warn_unused("string-buffer", &["buffer_name"]);
        Ok(Self {
            buffer: options.buffer_or(Array::DEFAULT_BUFFER)?,
        })
    }
}

impl BufferStrategy for StringBuffer {
    fn name(&self) -> &'static str {
        "string-buffer"
    }

    fn buffer(&self) -> &str {
        &self.buffer
    }

    fn create(&self, buffer: &str, _scope: Scope) -> String {
        format!("{buffer} = String.new")
    }

    fn append(&self, buffer: &str, value: &str) -> String {
        format!("{buffer} << ({value})")
    }

    fn finalize(&self, buffer: &str) -> String {
        buffer.to_string()
    }
}
