//! Tree-walking evaluator for SproutScript.
//!
//! The [`Interpreter`] walks a parsed [`sprout_ir::Program`] once; control
//! and function nodes re-walk their frozen bodies against the frames the
//! parser built for them. All I/O goes through the handler traits so
//! embedders and tests can capture it, and `test(a, b)` assertions land in
//! the interpreter-owned [`TestLedger`].

mod exec;
mod handlers;
mod interpreter;
mod ledger;

pub use handlers::{
    BufferPrinter, InputSource, PrintHandler, ScriptedInput, StdinInput, StdoutPrinter,
};
pub use interpreter::Interpreter;
pub use ledger::{TestEntry, TestLedger};
