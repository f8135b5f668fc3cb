//! tplgen - code generation backend for template IR.
//!
//! A front-end turns a template into a small IR tree; tplgen turns that tree
//! into Ruby source which, when evaluated, rebuilds the rendered output. The
//! same tree can target several runtime buffer conventions without being
//! parsed again.
//!
//! # Primary Usage
//!
//! ```
//! use tplgen::core::{Generator, Node, Renderer, StrategyOptions};
//! use tplgen::strategies::ArrayBuffer;
//!
//! let tree = Node::multi([
//!     Node::static_text("Hello, "),
//!     Node::dynamic("name"),
//! ]);
//! let generator = Generator::new(ArrayBuffer::new(&StrategyOptions::default())?);
//! assert_eq!(
//!     generator.render(&tree)?,
//!     r#"_buf = []; _buf << ("Hello, "); _buf << ((name).to_s); _buf.join("")"#
//! );
//! # Ok::<(), tplgen::core::CompileError>(())
//! ```
//!
//! # Architecture
//!
//! - [`core`] - IR, dispatcher, buffer protocol, capture scoping, errors
//! - [`strategies`] - array, array-buffer, string-buffer, safe-buffer and erb
//! - [`text_ir`] - textual IR reader and FileCheck harness
//! - [`cli`] - flags shared by the binary and FileCheck RUN lines

pub mod cli;
pub mod core;
pub mod strategies;
pub mod text_ir;

pub use crate::core::{
    BufferStrategy, CompileError, CompileResult, ConfigError, Generator, InlineStrategy, Node,
    RenderStats, Renderer, Scope, StrategyOptions,
};
pub use crate::strategies::{build, StrategyKind};
