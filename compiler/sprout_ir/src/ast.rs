//! Syntax tree built by the parser and walked by the evaluator.
//!
//! Every node that evaluates anything carries the frame that was on top of
//! the parser's scope stack when the node was built. Control nodes
//! additionally own a frozen body (the statement list collected while their
//! block was open) and the child frame that body was parsed in; that frame
//! is created once at parse time and reused on every activation.

use std::cell::RefCell;
use std::rc::Rc;

use crate::frame::FrameRef;
use crate::value::ValueRef;

/// A child position that may hold a literal value, a bare name, or a
/// sub-expression. Names stay unresolved until evaluation.
#[derive(Debug, Clone)]
pub enum Operand {
    Value(ValueRef),
    Name(String),
    Node(Rc<Node>),
}

impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Operand::Value(a), Operand::Value(b)) => *a.borrow() == *b.borrow(),
            (Operand::Name(a), Operand::Name(b)) => a == b,
            (Operand::Node(a), Operand::Node(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl ArithOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
            ArithOp::Pow => "**",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

/// Condition of one `if` chain arm. `Always` is the trailing `else`.
#[derive(Debug, Clone)]
pub enum Condition {
    Always,
    Test(Operand),
}

/// One arm of an `if` / `else if` / `else` chain. Arms link forward through
/// `else_arm`; later arms attach to the chain tail after the leading `if`
/// node has already been appended to the enclosing tree.
#[derive(Debug)]
pub struct IfArm {
    pub condition: Condition,
    pub frame: FrameRef,
    pub body: Vec<Rc<Node>>,
    else_arm: RefCell<Option<Rc<IfArm>>>,
}

impl IfArm {
    pub fn new(condition: Condition, frame: FrameRef, body: Vec<Rc<Node>>) -> Self {
        IfArm {
            condition,
            frame,
            body,
            else_arm: RefCell::new(None),
        }
    }

    /// Attaches `arm` at the end of the chain.
    pub fn append_statement(&self, arm: Rc<IfArm>) {
        let tail = self.else_arm.borrow().clone();
        match tail {
            Some(next) => next.append_statement(arm),
            None => *self.else_arm.borrow_mut() = Some(arm),
        }
    }

    pub fn else_arm(&self) -> Option<Rc<IfArm>> {
        self.else_arm.borrow().clone()
    }
}

/// A user function: parameter names plus the frozen body and the frame the
/// body was parsed in. Calls share one definition through `Rc`; the per-call
/// "clone" of a function is a handle copy.
#[derive(Debug)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    pub frame: FrameRef,
    pub body: Vec<Rc<Node>>,
}

/// Assignment target: a plain variable or one list slot.
#[derive(Debug, Clone)]
pub enum AssignTarget {
    Name(String),
    Index { list: String, index: Operand },
}

#[derive(Debug)]
pub enum Node {
    // Expressions
    Arithmetic {
        lhs: Operand,
        op: ArithOp,
        rhs: Operand,
        frame: FrameRef,
    },
    Comparison {
        lhs: Operand,
        op: CmpOp,
        rhs: Operand,
        frame: FrameRef,
    },
    Logic {
        lhs: Operand,
        op: LogicOp,
        rhs: Operand,
        frame: FrameRef,
    },
    Not {
        operand: Operand,
        frame: FrameRef,
    },
    Index {
        target: Operand,
        index: Operand,
        frame: FrameRef,
    },
    Assign {
        target: AssignTarget,
        value: Operand,
        frame: FrameRef,
    },
    FunctionCall {
        name: String,
        args: Vec<Operand>,
        frame: FrameRef,
    },

    // Control flow
    If(Rc<IfArm>),
    While {
        condition: Operand,
        frame: FrameRef,
        body: Vec<Rc<Node>>,
    },
    DoWhile {
        condition: Operand,
        frame: FrameRef,
        body: Vec<Rc<Node>>,
    },
    For {
        init: Rc<Node>,
        condition: Operand,
        increment: Operand,
        loop_var: String,
        frame: FrameRef,
        body: Vec<Rc<Node>>,
    },
    Break {
        frame: FrameRef,
    },
    Return {
        operand: Operand,
        frame: FrameRef,
    },

    // Built-ins
    Print {
        operand: Operand,
        frame: FrameRef,
    },
    Length {
        target: Operand,
        frame: FrameRef,
    },
    Split {
        target: Operand,
        delimiter: String,
        frame: FrameRef,
    },
    Append {
        list: Operand,
        item: Operand,
        frame: FrameRef,
    },
    Pop {
        list: Operand,
        frame: FrameRef,
    },
    Clear {
        list: Operand,
        frame: FrameRef,
    },
    Sort {
        list: Operand,
        frame: FrameRef,
    },
    DeleteAt {
        list: Operand,
        index: Operand,
        frame: FrameRef,
    },
    Input {
        prompt: Operand,
        frame: FrameRef,
    },
    WhatIs {
        target: Operand,
        frame: FrameRef,
    },
    Test {
        lhs: Operand,
        rhs: Operand,
        frame: FrameRef,
    },
}

/// A parsed program: the frozen top-level statement list plus the global
/// frame every other frame chains up to.
#[derive(Debug)]
pub struct Program {
    pub statements: Vec<Rc<Node>>,
    pub globals: FrameRef,
}
