//! Fatal error taxonomy.
//!
//! Every error in the language is fatal: lexing, parsing and evaluation all
//! stop at the first failure and surface a single `SproutError`. There is no
//! recovery and no error accumulation.

use thiserror::Error;

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SproutError {
    #[error("variable '{name}' does not exist in any reachable scope")]
    VariableNotFound { name: String },

    #[error("'{name}' is not a valid variable name")]
    VariableNameInvalid { name: String },

    #[error("'break' used outside of a loop")]
    BreakOutsideLoop,

    #[error("'return' used outside of a function body")]
    ReturnOutsideFunction,

    #[error("'else' or 'else if' without a preceding 'if'")]
    DanglingElse,

    #[error("invalid operator '{op}' for a string")]
    StringOperatorInvalid { op: String },

    #[error("index {index} is out of bounds (maximum index {max})")]
    IndexOutOfBounds { index: i64, max: i64 },

    #[error("bad argument for built-in '{builtin}'")]
    BuiltinArityOrType { builtin: &'static str },

    #[error("incompatible data types in operation")]
    DataTypeMismatch,

    #[error("unexpected token '{found}' at {span}")]
    UnexpectedToken { found: String, span: Span },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("function definitions are only allowed at the top level")]
    NestedFunction,

    #[error("file '{path}' cannot be found")]
    FileNotFound { path: String },

    #[error("'{path}' is not a SproutScript file (expected the '.sps' extension)")]
    WrongExtension { path: String },

    #[error("invalid command line arguments")]
    InvalidArguments,
}
