//! Node execution, split by concern.

mod builtins;
mod call;
mod control;
mod expr;
mod operand;

#[cfg(test)]
pub(crate) mod testing;
