//! Control flow: if-chains, the three loops, and `break`.
//!
//! Loops don't unwind to stop; they run with an "active" flag on their own
//! frame and every body statement is gated on it. `break` just clears the
//! flag on the nearest looping ancestor frame, so the remainder of the
//! current pass is skipped statement by statement.

use std::rc::Rc;

use sprout_ir::{Condition, Frame, FrameRef, IfArm, Node, Operand, SproutError, Value};

use crate::interpreter::{Flow, Interpreter};

impl Interpreter {
    pub(crate) fn exec_if(&mut self, head: &Rc<IfArm>) -> Result<Flow, SproutError> {
        let mut current = Some(head.clone());
        while let Some(arm) = current {
            let taken = match &arm.condition {
                Condition::Always => true,
                Condition::Test(operand) => self.cond_truthy(operand, &arm.frame)?,
            };
            if taken {
                return self.exec_body(&arm.body);
            }
            current = arm.else_arm();
        }
        Ok(Flow::Normal(Value::Nil.into_ref()))
    }

    pub(crate) fn exec_while(
        &mut self,
        condition: &Operand,
        frame: &FrameRef,
        body: &[Rc<Node>],
    ) -> Result<Flow, SproutError> {
        // A false condition up front leaves the loop flag untouched.
        if !self.loop_truthy(condition, frame)? {
            return Ok(Flow::Normal(Value::Nil.into_ref()));
        }
        frame.borrow_mut().set_loop_active(true);
        while frame.borrow().loop_active() {
            if let Some(flow) = self.loop_body_pass(frame, body)? {
                return Ok(flow);
            }
            if !self.loop_truthy(condition, frame)? {
                frame.borrow_mut().set_loop_active(false);
            }
        }
        Ok(Flow::Normal(Value::Nil.into_ref()))
    }

    pub(crate) fn exec_do_while(
        &mut self,
        condition: &Operand,
        frame: &FrameRef,
        body: &[Rc<Node>],
    ) -> Result<Flow, SproutError> {
        frame.borrow_mut().set_loop_active(true);
        while frame.borrow().loop_active() {
            if let Some(flow) = self.loop_body_pass(frame, body)? {
                return Ok(flow);
            }
            if !self.loop_truthy(condition, frame)? {
                break;
            }
        }
        frame.borrow_mut().set_loop_active(false);
        Ok(Flow::Normal(Value::Nil.into_ref()))
    }

    pub(crate) fn exec_for(
        &mut self,
        init: &Rc<Node>,
        condition: &Operand,
        increment: &Operand,
        loop_var: &str,
        frame: &FrameRef,
        body: &[Rc<Node>],
    ) -> Result<Flow, SproutError> {
        self.exec(init)?;
        if !self.loop_truthy(condition, frame)? {
            return Ok(Flow::Normal(Value::Nil.into_ref()));
        }
        frame.borrow_mut().set_loop_active(true);
        while frame.borrow().loop_active() {
            // The condition is re-checked at the top of the pass; a pass
            // that clears the flag still reaches the increment below, so
            // the loop variable ends one step past the bound.
            if !self.loop_truthy(condition, frame)? {
                frame.borrow_mut().set_loop_active(false);
            }
            if let Some(flow) = self.loop_body_pass(frame, body)? {
                return Ok(flow);
            }
            let next = self.resolve_value(increment, frame)?;
            Frame::assign(frame, loop_var, next);
        }
        Ok(Flow::Normal(Value::Nil.into_ref()))
    }

    pub(crate) fn exec_break(&mut self, frame: &FrameRef) -> Result<Flow, SproutError> {
        if !Frame::clear_nearest_loop(frame) {
            return Err(SproutError::BreakOutsideLoop);
        }
        Ok(Flow::Normal(Value::Nil.into_ref()))
    }

    /// One pass over a loop body, each statement gated on the frame's loop
    /// flag. `Some` means a `return` surfaced and the loop must hand it up.
    fn loop_body_pass(
        &mut self,
        frame: &FrameRef,
        body: &[Rc<Node>],
    ) -> Result<Option<Flow>, SproutError> {
        for stmt in body {
            if !frame.borrow().loop_active() {
                break;
            }
            if let Flow::Return(value) = self.exec(stmt)? {
                return Ok(Some(Flow::Return(value)));
            }
        }
        Ok(None)
    }
}
