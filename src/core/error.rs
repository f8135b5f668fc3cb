// This module defines the error types for tplgen using the thiserror crate. CompileError
// is the main enum covering every way a render can fail: an IR tag the backend does not
// know (only reachable through the textual reader, since the in-memory Node enum is
// closed), a malformed payload such as an invalid capture name or a node with the wrong
// arity, a lexical problem in textual IR, and strategy misconfiguration. ConfigError is
// raised while a strategy is constructed, before any IR is looked at. Each variant carries
// the offending tag, payload or option so front-end bugs are easy to track down.

//! Error types for the template backend.

use thiserror::Error;

/// Main error type for IR compilation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("unsupported node `{tag}` at {line}:{column}")]
    UnsupportedNode {
        tag: String,
        line: usize,
        column: usize,
    },

    #[error("malformed `{tag}` node: {reason}")]
    MalformedNode {
        tag: &'static str,
        reason: String,
    },

    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Strategy construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("option `{option}` is not a valid identifier: {value:?}")]
    InvalidIdentifier {
        option: &'static str,
        value: String,
    },

    #[error("strategy `{strategy}` requires option `{option}`")]
    MissingOption {
        strategy: &'static str,
        option: &'static str,
    },

    #[error("option `{option}` must not be empty")]
    EmptyOption { option: &'static str },
}

/// Result type alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
