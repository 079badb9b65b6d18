//! Expression nodes: arithmetic, comparison, logic, not, index, assign.

use sprout_ir::{
    ArithOp, AssignTarget, CmpOp, Frame, FrameRef, LogicOp, Operand, Primitive, Shared,
    SproutError, Value, ValueRef,
};

use crate::interpreter::Interpreter;

impl Interpreter {
    pub(crate) fn eval_arithmetic(
        &mut self,
        lhs: &Operand,
        op: ArithOp,
        rhs: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let l = self.resolve_primitive(lhs, frame)?;
        let r = self.resolve_primitive(rhs, frame)?;
        Ok(apply_arithmetic(&l, op, &r)?.into_ref())
    }

    pub(crate) fn eval_comparison(
        &mut self,
        lhs: &Operand,
        op: CmpOp,
        rhs: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let l = self.resolve_primitive(lhs, frame)?;
        let r = self.resolve_primitive(rhs, frame)?;
        let result = match op {
            CmpOp::Eq => l == r,
            CmpOp::NotEq => l != r,
            CmpOp::Lt | CmpOp::LtEq | CmpOp::Gt | CmpOp::GtEq => {
                let ord = l.compare(&r).ok_or(SproutError::DataTypeMismatch)?;
                match op {
                    CmpOp::Lt => ord.is_lt(),
                    CmpOp::LtEq => ord.is_le(),
                    CmpOp::Gt => ord.is_gt(),
                    _ => ord.is_ge(),
                }
            }
        };
        Ok(Value::Bool(result).into_ref())
    }

    /// `&&` / `||` resolve both operands one level and return an operand's
    /// value rather than a fresh bool. Falsiness here is narrower than
    /// everywhere else: only a bool-valued `false` counts, so integer zero
    /// passes as truthy.
    pub(crate) fn eval_logic(
        &mut self,
        lhs: &Operand,
        op: LogicOp,
        rhs: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let lv = self.resolve_value(lhs, frame)?;
        let rv = self.resolve_value(rhs, frame)?;
        let lt = logic_truthy(&lv);
        let rt = logic_truthy(&rv);
        Ok(match op {
            LogicOp::And => {
                if lt && rt {
                    rv
                } else {
                    Value::Bool(false).into_ref()
                }
            }
            LogicOp::Or => {
                if lt {
                    lv
                } else if rt {
                    rv
                } else {
                    Value::Bool(false).into_ref()
                }
            }
        })
    }

    pub(crate) fn eval_not(
        &mut self,
        operand: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let prim = self.resolve_primitive(operand, frame)?;
        Ok(Value::Bool(!prim.is_truthy()).into_ref())
    }

    pub(crate) fn eval_index(
        &mut self,
        target: &Operand,
        index: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        let idx = match self.resolve_primitive(index, frame)? {
            Primitive::Int(i) => i,
            _ => return Err(SproutError::DataTypeMismatch),
        };
        let tv = self.resolve_value(target, frame)?;
        let elem = {
            let borrowed = tv.borrow();
            match &*borrowed {
                Value::Str(s) => {
                    let value = match s.char_at(idx) {
                        Some(c) => Value::str(c.to_string()),
                        None => Value::Nil,
                    };
                    return Ok(value.into_ref());
                }
                Value::List(l) => {
                    if idx < 0 || idx > l.max_index() {
                        return Err(SproutError::IndexOutOfBounds {
                            index: idx,
                            max: l.max_index(),
                        });
                    }
                    l.elems[idx as usize].clone()
                }
                _ => return Err(SproutError::DataTypeMismatch),
            }
        };
        self.resolve_value(&elem, frame)
    }

    pub(crate) fn eval_assign(
        &mut self,
        target: &AssignTarget,
        value: &Operand,
        frame: &FrameRef,
    ) -> Result<ValueRef, SproutError> {
        match target {
            AssignTarget::Name(name) => {
                let stored = match value {
                    // A resolvable bare name aliases the same value object.
                    Operand::Name(rhs_name) => match Frame::lookup(frame, rhs_name) {
                        Some(existing) => existing,
                        // An unresolvable bare word becomes its own text.
                        None => Value::str(rhs_name.clone()).into_ref(),
                    },
                    Operand::Node(node) => self.eval(node)?,
                    // The parse-time literal object itself, not a copy.
                    Operand::Value(literal) => literal.clone(),
                };
                Frame::assign(frame, name, stored.clone());
                Ok(stored)
            }
            AssignTarget::Index { list, index } => {
                let idx = match self.resolve_primitive(index, frame)? {
                    Primitive::Int(i) => i,
                    _ => return Err(SproutError::DataTypeMismatch),
                };
                let target_ref =
                    Frame::lookup(frame, list).ok_or_else(|| SproutError::VariableNotFound {
                        name: list.clone(),
                    })?;
                let resolved = self.resolve_value(value, frame)?;
                let copy = resolved.borrow().clone();
                let mut borrowed = target_ref.borrow_mut();
                match &mut *borrowed {
                    Value::List(l) => {
                        if idx < 0 || idx > l.max_index() {
                            return Err(SproutError::IndexOutOfBounds {
                                index: idx,
                                max: l.max_index(),
                            });
                        }
                        // The slot gets a copy, never the original object.
                        l.elems[idx as usize] = Operand::Value(Shared::new(copy));
                        Ok(resolved.clone())
                    }
                    _ => Err(SproutError::DataTypeMismatch),
                }
            }
        }
    }
}

fn logic_truthy(value: &ValueRef) -> bool {
    !matches!(&*value.borrow(), Value::Bool(false))
}

fn apply_arithmetic(l: &Primitive, op: ArithOp, r: &Primitive) -> Result<Value, SproutError> {
    match (l, r) {
        (Primitive::Str(a), _) => string_arithmetic(a, op, r),
        (Primitive::Int(a), Primitive::Int(b)) => int_arithmetic(*a, op, *b),
        (Primitive::Int(a), Primitive::Float(b)) => float_arithmetic(*a as f64, op, *b),
        (Primitive::Float(a), Primitive::Int(b)) => float_arithmetic(*a, op, *b as f64),
        (Primitive::Float(a), Primitive::Float(b)) => float_arithmetic(*a, op, *b),
        // No rule covers the remaining combinations; they quietly make nil.
        _ => Ok(Value::Nil),
    }
}

fn string_arithmetic(a: &str, op: ArithOp, r: &Primitive) -> Result<Value, SproutError> {
    match op {
        ArithOp::Add => match r {
            Primitive::Str(b) => Ok(Value::str(format!("{a}{b}"))),
            _ => Err(SproutError::DataTypeMismatch),
        },
        ArithOp::Mul => match r {
            Primitive::Int(n) if *n >= 0 => Ok(Value::str(a.repeat(*n as usize))),
            Primitive::Int(_) => Err(SproutError::StringOperatorInvalid { op: "*".into() }),
            _ => Err(SproutError::DataTypeMismatch),
        },
        other => Err(SproutError::StringOperatorInvalid {
            op: other.as_str().into(),
        }),
    }
}

fn int_arithmetic(a: i64, op: ArithOp, b: i64) -> Result<Value, SproutError> {
    let value = match op {
        ArithOp::Add => a.wrapping_add(b),
        ArithOp::Sub => a.wrapping_sub(b),
        ArithOp::Mul => a.wrapping_mul(b),
        ArithOp::Div => {
            if b == 0 {
                return Err(SproutError::DataTypeMismatch);
            }
            floor_div(a, b)
        }
        ArithOp::Mod => {
            if b == 0 {
                return Err(SproutError::DataTypeMismatch);
            }
            floor_mod(a, b)
        }
        ArithOp::Pow => {
            let exp = u32::try_from(b).map_err(|_| SproutError::DataTypeMismatch)?;
            a.checked_pow(exp).ok_or(SproutError::DataTypeMismatch)?
        }
    };
    Ok(Value::Int(value))
}

fn float_arithmetic(a: f64, op: ArithOp, b: f64) -> Result<Value, SproutError> {
    Ok(Value::Float(match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        ArithOp::Mod => a - b * (a / b).floor(),
        ArithOp::Pow => a.powf(b),
    }))
}

/// Floor division: the quotient rounds toward negative infinity.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Floored modulo: the result takes the divisor's sign.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}
