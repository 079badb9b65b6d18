//! Operand resolution.
//!
//! Two depths of resolution exist and the distinction is load-bearing:
//! resolving *one level* yields a value object (names follow the frame
//! chain, nodes run, literals pass through), while *unwrapping* goes all
//! the way to a primitive, re-resolving list elements each time.

use sprout_ir::{Frame, FrameRef, Operand, Primitive, SproutError, Value, ValueRef};

use crate::interpreter::Interpreter;

impl Interpreter {
    /// One level: name -> bound value handle, node -> run, literal -> itself.
    pub(crate) fn resolve_value(
        &mut self,
        operand: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        match operand {
            Operand::Value(value) => Ok(value.clone()),
            Operand::Name(name) => {
                Frame::lookup(frame, name).ok_or_else(|| SproutError::VariableNotFound {
                    name: name.clone(),
                })
            }
            Operand::Node(node) => self.eval(node),
        }
    }

    /// All the way down to a primitive.
    pub(crate) fn resolve_primitive(
        &mut self,
        operand: &Operand,
        frame: &FrameRef,
    ) -> Result<Primitive, SproutError> {
        let value = self.resolve_value(operand, frame)?;
        self.unwrap_ref(&value, frame)
    }

    /// Unwraps a value object. List elements are stored unevaluated and
    /// resolve here, against the frame of whatever is doing the unwrapping.
    pub(crate) fn unwrap_ref(
        &mut self,
        value: &ValueRef,
        frame: &FrameRef,
    ) -> Result<Primitive, SproutError> {
        let elems = {
            let borrowed = value.borrow();
            match &*borrowed {
                Value::Nil => return Ok(Primitive::Nil),
                Value::Bool(b) => return Ok(Primitive::Bool(*b)),
                Value::Int(n) => return Ok(Primitive::Int(*n)),
                Value::Float(x) => return Ok(Primitive::Float(*x)),
                Value::Str(s) => return Ok(Primitive::Str(s.text().to_string())),
                Value::List(l) => l.elems.clone(),
            }
        };
        let mut items = Vec::with_capacity(elems.len());
        for elem in &elems {
            items.push(self.resolve_primitive(elem, frame)?);
        }
        Ok(Primitive::List(items))
    }

    /// Truthiness for `if` conditions and `!`: resolve fully, then only
    /// `Nil` and `false` are falsy.
    pub(crate) fn cond_truthy(
        &mut self,
        operand: &Operand,
        frame: &FrameRef,
    ) -> Result<bool, SproutError> {
        Ok(self.resolve_primitive(operand, frame)?.is_truthy())
    }

    /// Truthiness for loop conditions, which treat already-built literals
    /// specially: a bool literal passes through, a literal integer zero is
    /// false, and any other literal (including float 0.0) is true. Names
    /// and nodes fall back to full resolution and native truthiness.
    pub(crate) fn loop_truthy(
        &mut self,
        operand: &Operand,
        frame: &FrameRef,
    ) -> Result<bool, SproutError> {
        match operand {
            Operand::Value(value) => Ok(match &*value.borrow() {
                Value::Bool(b) => *b,
                Value::Int(0) => false,
                _ => true,
            }),
            _ => Ok(self.resolve_primitive(operand, frame)?.is_truthy()),
        }
    }
}
