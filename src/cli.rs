//! Command line options shared by the `tplgen` binary and FileCheck RUN lines.

use clap::Args;

use crate::core::{CompileResult, Renderer, StrategyOptions};
use crate::strategies::{self, StrategyKind};

/// Strategy selection and options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct RenderArgs {
    /// Code generation strategy.
    #[arg(long, value_enum, default_value_t = StrategyKind::ArrayBuffer)]
    pub strategy: StrategyKind,

    /// Base name of the buffer variable.
    #[arg(long = "buffer", value_name = "NAME")]
    pub buffer_name: Option<String>,

    /// Freeze the joined result (array-buffer).
    #[arg(long)]
    pub freeze_static: bool,

    /// Always emit create/append/finalize, even for a single node.
    #[arg(long)]
    pub no_fast_path: bool,

    /// Buffer constructor (safe-buffer).
    #[arg(long, value_name = "CLASS")]
    pub buffer_class: Option<String>,

    /// Reuse the caller's buffer for the outermost output (safe-buffer).
    #[arg(long, requires = "stream_buffer")]
    pub streaming: bool,

    /// Expression naming the caller's buffer (safe-buffer).
    #[arg(long, value_name = "REF")]
    pub stream_buffer: Option<String>,

    /// Print the parsed IR instead of generating code.
    #[arg(long)]
    pub print_ir: bool,
}

impl RenderArgs {
    pub fn options(&self) -> StrategyOptions {
        StrategyOptions {
            buffer_name: self.buffer_name.clone(),
            freeze_static: self.freeze_static,
            fast_path: !self.no_fast_path,
            buffer_class: self.buffer_class.clone(),
            streaming: self.streaming,
            stream_buffer: self.stream_buffer.clone(),
        }
    }

    /// Build the selected strategy, validating its options.
    pub fn renderer(&self) -> CompileResult<Box<dyn Renderer>> {
        strategies::build(self.strategy, &self.options())
    }
}
