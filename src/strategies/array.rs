//! Growable-list strategy.
//!
//! Output is pushed onto a Ruby array and the array itself is returned;
//! joining is left to the caller.

use crate::core::{BufferStrategy, ConfigError, Scope, StrategyOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    buffer: String,
}

impl Array {
    pub const DEFAULT_BUFFER: &'static str = "_buf";

    pub fn new(options: &StrategyOptions) -> Result<Self, ConfigError> {
        options.warn_unused("array", &["buffer_name"]);
        Ok(Self {
            buffer: options.buffer_or(Self::DEFAULT_BUFFER)?,
        })
    }
}

impl BufferStrategy for Array {
    fn name(&self) -> &'static str {
        "array"
    }

    fn buffer(&self) -> &str {
        &self.buffer
    }

    fn create(&self, buffer: &str, _scope: Scope) -> String {
        format!("{buffer} = []")
    }

    fn append(&self, buffer: &str, value: &str) -> String {
        format!("{buffer} << ({value})")
    }

    fn finalize(&self, buffer: &str) -> String {
        buffer.to_string()
    }
}
