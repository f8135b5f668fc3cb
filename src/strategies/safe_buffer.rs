// This module implements the framework safe-string strategy. Output goes into a
// framework-provided buffer object (ActionView::OutputBuffer by default) through
// safe_concat, which appends without escaping again: static text is trusted and dynamic
// values reach the buffer already escaped by the front-end or intentionally raw. With
// streaming enabled the outermost buffer reuses the one handed in by the caller and only
// falls back to constructing a new object when that is nil. Capture buffers are always
// freshly constructed, otherwise captured output would land in the streamed response.

//! Framework safe-string strategy.

use crate::core::{BufferStrategy, ConfigError, Scope, StrategyOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeBuffer {
    buffer: String,
    buffer_class: String,
    stream_buffer: Option<String>,
}

impl SafeBuffer {
    pub const DEFAULT_BUFFER: &'static str = "@output_buffer";
    pub const DEFAULT_CLASS: &'static str = "ActionView::OutputBuffer";

    pub fn new(options: &StrategyOptions) -> Result<Self, ConfigError> {
        options.warn_unused("safe-buffer", &["buffer_name", "buffer_class", "streaming"]);

        let buffer_class = match &options.buffer_class {
            Some(class) if class.trim().is_empty() => {
                return Err(ConfigError::EmptyOption {
                    option: "buffer_class",
                })
            }
            Some(class) => class.clone(),
            None => Self::DEFAULT_CLASS.to_string(),
        };

        let stream_buffer = match (options.streaming, &options.stream_buffer) {
            (true, None) => {
                return Err(ConfigError::MissingOption {
                    strategy: "safe-buffer",
                    option: "stream_buffer",
                })
            }
            (true, Some(reference)) if reference.trim().is_empty() => {
                return Err(ConfigError::EmptyOption {
                    option: "stream_buffer",
                })
            }
            (true, Some(reference)) => Some(reference.clone()),
            (false, Some(_)) => {
                log::warn!("`stream_buffer` is ignored unless `streaming` is set");
                None
            }
            (false, None) => None,
        };

        Ok(Self {
            buffer: options.buffer_or(Self::DEFAULT_BUFFER)?,
            buffer_class,
            stream_buffer,
        })
    }

    pub fn is_streaming(&self) -> bool {
        self.stream_buffer.is_some()
    }
}

impl BufferStrategy for SafeBuffer {
    fn name(&self) -> &'static str {
        "safe-buffer"
    }

    fn buffer(&self) -> &str {
        &self.buffer
    }

    fn create(&self, buffer: &str, scope: Scope) -> String {
        match &self.stream_buffer {
            Some(stream) if scope.is_root() => {
                format!("{buffer} = {stream} || {}.new", self.buffer_class)
            }
            _ => format!("{buffer} = {}.new", self.buffer_class),
        }
    }

    fn append(&self, buffer: &str, value: &str) -> String {
        format!("{buffer}.safe_concat(({value}))")
    }

    fn finalize(&self, buffer: &str) -> String {
        buffer.to_string()
    }
}
