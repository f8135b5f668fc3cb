// This module is the hub of tplgen's shared framework: the IR every strategy consumes,
// the error types, the per-render session (buffer scope and stats), the strategy traits
// and the generic dispatcher that drives buffer based strategies. Concrete strategies live
// in crate::strategies and only implement the traits defined here.

//! Core framework.
//!
//! # Key Components
//!
//! - [`ir`]: the five node IR.
//! - [`compiler`]: the [`Generator`] dispatcher and capture scoping.
//! - [`strategy`]: [`BufferStrategy`], [`InlineStrategy`], [`Renderer`] and
//!   [`StrategyOptions`].
//! - [`session`]: [`Scope`] (buffer depth) and [`RenderStats`].
//! - [`error`]: [`CompileError`] and [`ConfigError`].

pub mod compiler;
pub mod error;
pub mod ir;
pub mod literal;
pub mod session;
pub mod strategy;

pub use compiler::{Generator, STATEMENT_SEPARATOR};
pub use error::{CompileError, CompileResult, ConfigError};
pub use ir::Node;
pub use literal::ruby_string_literal;
pub use session::{is_buffer_name, RenderSession, RenderStats, Scope};
pub use strategy::{is_identifier, BufferStrategy, InlineStrategy, Renderer, StrategyOptions};
