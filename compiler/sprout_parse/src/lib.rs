//! Parser for SproutScript.
//!
//! Turns the token stream into a [`sprout_ir::Program`]: the frozen
//! top-level statement list plus the global frame. Scopes are built during
//! parsing, not execution — see the `parser` module docs.

mod cursor;
mod parser;

pub use parser::{parse, Parser};
