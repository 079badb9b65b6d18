//! The parser.
//!
//! Parsing builds scopes and trees at the same time: every block-opening
//! keyword pushes a fresh (statement buffer, frame) pair onto an explicit
//! stack *before* the block's header is parsed, and closing the block pops
//! the pair, freezes the buffer, and hands both to the control node being
//! built. The frame a node captures here is the one it will execute
//! against on every activation.

mod expr;
mod stmt;

#[cfg(test)]
mod tests;

use std::rc::Rc;

use sprout_ir::{Frame, FrameRef, IfArm, Node, Program, SproutError};
use sprout_lexer::{Token, TokenKind};

use crate::cursor::Cursor;

/// One open block: the statements collected so far and the frame they were
/// parsed in.
struct Block {
    stmts: Vec<Rc<Node>>,
    frame: FrameRef,
}

pub struct Parser {
    cursor: Cursor,
    root: Block,
    open: Vec<Block>,
    in_function: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            root: Block {
                stmts: Vec::new(),
                frame: Frame::root(),
            },
            open: Vec::new(),
            in_function: false,
        }
    }

    pub fn parse_program(mut self) -> Result<Program, SproutError> {
        while !self.cursor.at_end() {
            self.parse_row()?;
        }
        tracing::debug!(statements = self.root.stmts.len(), "parse complete");
        Ok(Program {
            statements: self.root.stmts,
            globals: self.root.frame,
        })
    }

    fn parse_row(&mut self) -> Result<(), SproutError> {
        match self.cursor.peek_kind() {
            Some(TokenKind::If) => self.parse_if(),
            Some(TokenKind::ElseIf) => self.parse_else_if(),
            Some(TokenKind::Else) => self.parse_else(),
            Some(TokenKind::While) => self.parse_while(),
            Some(TokenKind::Do) => self.parse_do_while(),
            Some(TokenKind::For) => self.parse_for(),
            Some(TokenKind::Function) => self.parse_function(),
            Some(TokenKind::Return) => self.parse_return(),
            Some(TokenKind::Print) => self.parse_print(),
            Some(TokenKind::Break) => {
                self.cursor.advance();
                let frame = self.frame();
                self.append(Node::Break { frame });
                Ok(())
            }
            Some(kind) if stmt::is_builtin_opener(kind) => {
                let node = self.parse_builtin()?;
                self.cursor.expect(&TokenKind::Semicolon)?;
                self.append(node);
                Ok(())
            }
            Some(TokenKind::Ident(_)) => self.parse_var_row(),
            Some(_) => {
                // A bare expression row parses but leaves no statement
                // behind; only function calls have an effect on their own.
                let operand = self.parse_logical_operand()?;
                self.cursor.expect(&TokenKind::Semicolon)?;
                self.append_if_call(operand);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Frame on top of the scope stack.
    fn frame(&self) -> FrameRef {
        self.open
            .last()
            .map_or_else(|| self.root.frame.clone(), |b| b.frame.clone())
    }

    fn current_mut(&mut self) -> &mut Block {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn append(&mut self, node: Node) {
        self.current_mut().stmts.push(Rc::new(node));
    }

    fn append_rc(&mut self, node: Rc<Node>) {
        self.current_mut().stmts.push(node);
    }

    fn append_if_call(&mut self, operand: sprout_ir::Operand) {
        if let sprout_ir::Operand::Node(node) = operand {
            if matches!(*node, Node::FunctionCall { .. }) {
                self.append_rc(node);
            }
        }
    }

    /// Opens a block: child frame of the current one, empty buffer.
    fn push_block(&mut self) {
        let parent = self.frame();
        self.open.push(Block {
            stmts: Vec::new(),
            frame: Frame::child_of(&parent),
        });
    }

    /// Closes the innermost block, yielding its frozen body and frame.
    fn pop_block(&mut self) -> (Vec<Rc<Node>>, FrameRef) {
        match self.open.pop() {
            Some(block) => (block.stmts, block.frame),
            None => (Vec::new(), self.root.frame.clone()),
        }
    }

    fn at_top_level(&self) -> bool {
        self.open.is_empty()
    }

    /// The if-chain the next `else if` / `else` arm belongs to: the last
    /// statement of the current tree must be an `if` node.
    fn chain_head(&mut self) -> Result<Rc<IfArm>, SproutError> {
        match self.current_mut().stmts.last() {
            Some(node) => match &**node {
                Node::If(arm) => Ok(arm.clone()),
                _ => Err(SproutError::DanglingElse),
            },
            None => Err(SproutError::DanglingElse),
        }
    }
}

/// Parses a full token stream into a program.
pub fn parse(tokens: Vec<Token>) -> Result<Program, SproutError> {
    Parser::new(tokens).parse_program()
}
