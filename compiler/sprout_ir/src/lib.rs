//! Core data model for the Sprout interpreter.
//!
//! Shared by the lexer, parser and evaluator: runtime values, lexical
//! frames, the syntax tree, byte spans, and the fatal error taxonomy.

mod ast;
mod error;
mod frame;
mod shared;
mod span;
mod value;

pub use ast::{
    ArithOp, AssignTarget, CmpOp, Condition, FunctionDef, IfArm, LogicOp, Node, Operand, Program,
};
pub use error::SproutError;
pub use frame::{Frame, FrameRef, FunctionTable};
pub use shared::Shared;
pub use span::Span;
pub use value::{ListValue, Primitive, StrValue, Value, ValueRef};
