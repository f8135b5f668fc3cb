// This module collects the concrete code generation strategies. Four of them implement
// the buffer protocol and are driven by core::Generator: Array (growable list returned as
// is), ArrayBuffer (list joined into one string, optionally frozen, with a direct
// assignment fast path), StringBuffer (one mutable String) and SafeBuffer (framework
// buffer with trusted appends and optional streaming reuse). Erb skips buffers entirely and
// maps nodes to inline markup. StrategyKind and build() let callers choose one at run time
// from validated options, returning it behind the object safe Renderer trait.

//! Concrete strategies.

mod array;
mod array_buffer;
mod erb;
mod safe_buffer;
mod string_buffer;

use std::fmt;

use clap::ValueEnum;
use log::debug;

pub use array::Array;
pub use array_buffer::ArrayBuffer;
pub use erb::Erb;
pub use safe_buffer::SafeBuffer;
pub use string_buffer::StringBuffer;

use crate::core::{CompileResult, Generator, Renderer, StrategyOptions};

/// Selectable strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum StrategyKind {
    /// Growable list, returned unjoined.
    Array,
    /// List joined into one string.
    #[default]
    ArrayBuffer,
    /// Single mutable string.
    StringBuffer,
    /// Framework safe-string buffer.
    SafeBuffer,
    /// Inline ERB markup.
    Erb,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Array,
        StrategyKind::ArrayBuffer,
        StrategyKind::StringBuffer,
        StrategyKind::SafeBuffer,
        StrategyKind::Erb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Array => "array",
            StrategyKind::ArrayBuffer => "array-buffer",
            StrategyKind::StringBuffer => "string-buffer",
            StrategyKind::SafeBuffer => "safe-buffer",
            StrategyKind::Erb => "erb",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Construct the strategy `kind` from `options`.
///
/// Options are validated here, before any IR is compiled.
pub fn build(kind: StrategyKind, options: &StrategyOptions) -> CompileResult<Box<dyn Renderer>> {
    debug!("building {kind} strategy with {options:?}");
    let fast_path = options.fast_path;
    let renderer: Box<dyn Renderer> = match kind {
        StrategyKind::Array => {
            Box::new(Generator::new(Array::new(options)?).with_fast_path(fast_path))
        }
        StrategyKind::ArrayBuffer => {
            Box::new(Generator::new(ArrayBuffer::new(options)?).with_fast_path(fast_path))
        }
        StrategyKind::StringBuffer => {
            Box::new(Generator::new(StringBuffer::new(options)?).with_fast_path(fast_path))
        }
        StrategyKind::SafeBuffer => {
            Box::new(Generator::new(SafeBuffer::new(options)?).with_fast_path(fast_path))
        }
        StrategyKind::Erb => {
            options.warn_unused("erb", &[]);
            Box::new(Erb::new())
        }
    };
    Ok(renderer)
}
