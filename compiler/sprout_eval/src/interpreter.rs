//! The interpreter: owns the assertion ledger and the I/O handlers, and
//! dispatches tree walks over [`Node`]s.

use sprout_ir::{Node, Program, SproutError, Value, ValueRef};

use crate::handlers::{InputSource, PrintHandler, StdinInput, StdoutPrinter};
use crate::ledger::TestLedger;

/// How a statement finished: normally with a value, or by hitting `return`.
/// `Return` unwinds through enclosing blocks until a function call catches
/// it; the parser guarantees it can never escape the top level.
pub(crate) enum Flow {
    Normal(ValueRef),
    Return(ValueRef),
}

pub struct Interpreter {
    pub(crate) ledger: TestLedger,
    pub(crate) printer: Box<dyn PrintHandler>,
    pub(crate) input: Box<dyn InputSource>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_handlers(Box::new(StdoutPrinter), Box::new(StdinInput))
    }

    pub fn with_handlers(printer: Box<dyn PrintHandler>, input: Box<dyn InputSource>) -> Self {
        Interpreter {
            ledger: TestLedger::default(),
            printer,
            input,
        }
    }

    /// Walks the top-level statement list once.
    pub fn run(&mut self, program: &Program) -> Result<(), SproutError> {
        for stmt in &program.statements {
            self.exec(stmt)?;
        }
        Ok(())
    }

    pub fn ledger(&self) -> &TestLedger {
        &self.ledger
    }

    pub(crate) fn exec(&mut self, node: &Node) -> Result<Flow, SproutError> {
        match node {
            Node::Arithmetic { lhs, op, rhs, frame } => {
                Ok(Flow::Normal(self.eval_arithmetic(lhs, *op, rhs, frame)?))
            }
            Node::Comparison { lhs, op, rhs, frame } => {
                Ok(Flow::Normal(self.eval_comparison(lhs, *op, rhs, frame)?))
            }
            Node::Logic { lhs, op, rhs, frame } => {
                Ok(Flow::Normal(self.eval_logic(lhs, *op, rhs, frame)?))
            }
            Node::Not { operand, frame } => Ok(Flow::Normal(self.eval_not(operand, frame)?)),
            Node::Index { target, index, frame } => {
                Ok(Flow::Normal(self.eval_index(target, index, frame)?))
            }
            Node::Assign { target, value, frame } => {
                Ok(Flow::Normal(self.eval_assign(target, value, frame)?))
            }
            Node::FunctionCall { name, args, frame } => {
                Ok(Flow::Normal(self.eval_call(name, args, frame)?))
            }

            Node::If(arm) => self.exec_if(arm),
            Node::While { condition, frame, body } => self.exec_while(condition, frame, body),
            Node::DoWhile { condition, frame, body } => {
                self.exec_do_while(condition, frame, body)
            }
            Node::For {
                init,
                condition,
                increment,
                loop_var,
                frame,
                body,
            } => self.exec_for(init, condition, increment, loop_var, frame, body),
            Node::Break { frame } => self.exec_break(frame),
            Node::Return { operand, frame } => {
                Ok(Flow::Return(self.resolve_value(operand, frame)?))
            }

            Node::Print { operand, frame } => Ok(Flow::Normal(self.eval_print(operand, frame)?)),
            Node::Length { target, frame } => Ok(Flow::Normal(self.eval_length(target, frame)?)),
            Node::Split {
                target,
                delimiter,
                frame,
            } => Ok(Flow::Normal(self.eval_split(target, delimiter, frame)?)),
            Node::Append { list, item, frame } => {
                Ok(Flow::Normal(self.eval_append(list, item, frame)?))
            }
            Node::Pop { list, frame } => Ok(Flow::Normal(self.eval_pop(list, frame)?)),
            Node::Clear { list, frame } => Ok(Flow::Normal(self.eval_clear(list, frame)?)),
            Node::Sort { list, frame } => Ok(Flow::Normal(self.eval_sort(list, frame)?)),
            Node::DeleteAt { list, index, frame } => {
                Ok(Flow::Normal(self.eval_delete_at(list, index, frame)?))
            }
            Node::Input { prompt, frame } => Ok(Flow::Normal(self.eval_input(prompt, frame)?)),
            Node::WhatIs { target, frame } => Ok(Flow::Normal(self.eval_what_is(target, frame)?)),
            Node::Test { lhs, rhs, frame } => Ok(Flow::Normal(self.eval_test(lhs, rhs, frame)?)),
        }
    }

    /// Evaluates a node in expression position, where `return` cannot occur.
    pub(crate) fn eval(&mut self, node: &Node) -> Result<ValueRef, SproutError> {
        match self.exec(node)? {
            Flow::Normal(value) | Flow::Return(value) => Ok(value),
        }
    }

    /// Runs a frozen body in order, surfacing `return` to the caller.
    pub(crate) fn exec_body(&mut self, body: &[std::rc::Rc<Node>]) -> Result<Flow, SproutError> {
        for stmt in body {
            if let Flow::Return(value) = self.exec(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal(Value::Nil.into_ref()))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
