//! User function calls.
//!
//! The call protocol, in order: resolve the definition through the
//! outermost frame's table; bind arguments one at a time into the
//! function's own frame (bare names resolve through the *callee's* chain,
//! which still has its parent at this point); copy the parent's
//! function-table handle down; detach the parent pointer for the duration
//! of the body; restore it on every exit path. The detachment is what
//! keeps a function from reading its caller's locals; the table copy is
//! what keeps recursive calls resolvable anyway.
//!
//! A call does not get a fresh frame. The per-call "clone" of a function
//! is a handle copy, so every activation shares the definition's one
//! frame and its bindings persist between calls.

use sprout_ir::{Frame, FrameRef, Operand, SproutError, Value, ValueRef};

use crate::interpreter::{Flow, Interpreter};

impl Interpreter {
    pub(crate) fn eval_call(
        &mut self,
        name: &str,
        args: &[Operand],
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let table = Frame::outermost(frame).borrow().functions();
        let def = table
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| SproutError::VariableNotFound {
                name: name.to_string(),
            })?;
        if def.params.len() != args.len() {
            return Err(SproutError::DataTypeMismatch);
        }
        tracing::debug!(function = %name, args = args.len(), "calling function");

        let fn_frame = def.frame.clone();

        // Sequential binding: a later bare-name argument can see the
        // parameters already bound before it.
        for (param, arg) in def.params.iter().zip(args) {
            let value = match arg {
                Operand::Name(arg_name) => Frame::lookup(&fn_frame, arg_name).ok_or_else(|| {
                    SproutError::VariableNotFound {
                        name: arg_name.clone(),
                    }
                })?,
                Operand::Value(literal) => literal.clone(),
                Operand::Node(node) => self.eval(node)?,
            };
            fn_frame.borrow_mut().set_local(param.clone(), value);
        }

        // Copy the parent's table handle down, then detach.
        let saved_parent = fn_frame.borrow().parent();
        if let Some(parent) = &saved_parent {
            let table = parent.borrow().functions();
            fn_frame.borrow_mut().set_functions(table);
        }
        fn_frame.borrow_mut().set_parent(None);

        let outcome = self.exec_body(&def.body);

        // Reattach before surfacing anything, including errors.
        fn_frame.borrow_mut().set_parent(saved_parent);

        match outcome? {
            Flow::Return(value) => Ok(value),
            Flow::Normal(_) => Ok(Value::Nil.into_ref()),
        }
    }
}
