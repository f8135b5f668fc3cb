//! Textual IR format and FileCheck harness.
//!
//! The textual form is a plain serialisation of [`Node`](crate::core::Node)
//! trees, used by the `tplgen` binary and by the test fixtures. It is not a
//! template language; front-ends hand over IR, not template source.
//!
//! # Format
//!
//! ```text
//! ; Comments start with semicolon
//! (multi
//!   (static "Hello, ")
//!   (dynamic "name")
//!   (capture greeting (static "hi"))
//!   (code "x = 1"))
//! ```
//!
//! Strings accept the escapes `\" \\ \n \t \r \0`. Capture names are bare
//! identifiers or quoted strings.

pub mod check;
pub mod parser;

pub use check::{CheckDirective, CheckError, TestRunner, TestSpec};
pub use parser::parse_ir;
