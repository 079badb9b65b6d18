//! Expression productions, one method per precedence level.
//!
//! logical -> comparison -> not -> index -> additive -> term -> power ->
//! primary. Every level returns an `Operand` so literals and bare names
//! flow through without being wrapped in nodes; a node only appears where
//! an operator actually combined something.

use std::rc::Rc;

use sprout_ir::{ArithOp, CmpOp, LogicOp, Node, Operand, SproutError, Value};
use sprout_lexer::TokenKind;

use super::Parser;

impl Parser {
    fn node(&self, node: Node) -> Operand {
        Operand::Node(Rc::new(node))
    }

    pub(super) fn parse_logical_operand(&mut self) -> Result<Operand, SproutError> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.cursor.peek_kind() {
                Some(TokenKind::AndAnd) => LogicOp::And,
                Some(TokenKind::OrOr) => LogicOp::Or,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_comparison()?;
            let frame = self.frame();
            lhs = self.node(Node::Logic {
                lhs,
                op,
                rhs,
                frame,
            });
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Operand, SproutError> {
        let mut lhs = self.parse_not()?;
        loop {
            let op = match self.cursor.peek_kind() {
                Some(TokenKind::EqEq) => CmpOp::Eq,
                Some(TokenKind::NotEq) => CmpOp::NotEq,
                Some(TokenKind::LtEq) => CmpOp::LtEq,
                Some(TokenKind::GtEq) => CmpOp::GtEq,
                Some(TokenKind::Lt) => CmpOp::Lt,
                Some(TokenKind::Gt) => CmpOp::Gt,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_not()?;
            let frame = self.frame();
            lhs = self.node(Node::Comparison {
                lhs,
                op,
                rhs,
                frame,
            });
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Operand, SproutError> {
        if self.cursor.check(&TokenKind::Bang) {
            self.cursor.advance();
            let operand = self.parse_not()?;
            let frame = self.frame();
            return Ok(self.node(Node::Not { operand, frame }));
        }
        self.parse_index()
    }

    /// `name[expr]` / `"literal"[expr]`, otherwise falls through to the
    /// arithmetic levels.
    fn parse_index(&mut self) -> Result<Operand, SproutError> {
        let indexable = matches!(
            self.cursor.peek_kind(),
            Some(TokenKind::Ident(_) | TokenKind::Str(_))
        ) && matches!(self.cursor.peek_ahead(1), Some(TokenKind::LBracket));
        if !indexable {
            return self.parse_expr();
        }

        let target = match self.cursor.advance().map(|t| t.kind) {
            Some(TokenKind::Ident(name)) => Operand::Name(name),
            Some(TokenKind::Str(s)) => Operand::Value(Value::str(s).into_ref()),
            _ => return Err(SproutError::UnexpectedEof),
        };
        self.cursor.advance(); // [
        let index = self.parse_expr()?;
        self.cursor.expect(&TokenKind::RBracket)?;
        let frame = self.frame();
        Ok(self.node(Node::Index {
            target,
            index,
            frame,
        }))
    }

    /// Additive level, plus the `x++` / `x += e` sugar which desugars to
    /// plain addition in expression position.
    pub(super) fn parse_expr(&mut self) -> Result<Operand, SproutError> {
        let mut lhs = self.parse_term()?;
        loop {
            match self.cursor.peek_kind() {
                Some(TokenKind::Plus) => {
                    self.cursor.advance();
                    let rhs = self.parse_term()?;
                    let frame = self.frame();
                    lhs = self.node(Node::Arithmetic {
                        lhs,
                        op: ArithOp::Add,
                        rhs,
                        frame,
                    });
                }
                Some(TokenKind::Minus) => {
                    self.cursor.advance();
                    let rhs = self.parse_term()?;
                    let frame = self.frame();
                    lhs = self.node(Node::Arithmetic {
                        lhs,
                        op: ArithOp::Sub,
                        rhs,
                        frame,
                    });
                }
                Some(TokenKind::PlusPlus) => {
                    self.cursor.advance();
                    let frame = self.frame();
                    lhs = self.node(Node::Arithmetic {
                        lhs,
                        op: ArithOp::Add,
                        rhs: Operand::Value(Value::Int(1).into_ref()),
                        frame,
                    });
                }
                Some(TokenKind::PlusEq) => {
                    self.cursor.advance();
                    let rhs = self.parse_term()?;
                    let frame = self.frame();
                    lhs = self.node(Node::Arithmetic {
                        lhs,
                        op: ArithOp::Add,
                        rhs,
                        frame,
                    });
                }
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Operand, SproutError> {
        let mut lhs = self.parse_power()?;
        loop {
            let op = match self.cursor.peek_kind() {
                Some(TokenKind::Star) => ArithOp::Mul,
                Some(TokenKind::Slash) => ArithOp::Div,
                Some(TokenKind::Percent) => ArithOp::Mod,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_power()?;
            let frame = self.frame();
            lhs = self.node(Node::Arithmetic {
                lhs,
                op,
                rhs,
                frame,
            });
        }
        Ok(lhs)
    }

    /// `^` is exponentiation and right-associative.
    fn parse_power(&mut self) -> Result<Operand, SproutError> {
        let base = self.parse_primary()?;
        if self.cursor.check(&TokenKind::Caret) {
            self.cursor.advance();
            let exponent = self.parse_power()?;
            let frame = self.frame();
            return Ok(self.node(Node::Arithmetic {
                lhs: base,
                op: ArithOp::Pow,
                rhs: exponent,
                frame,
            }));
        }
        Ok(base)
    }

    pub(super) fn parse_primary(&mut self) -> Result<Operand, SproutError> {
        match self.cursor.peek_kind().cloned() {
            Some(TokenKind::LParen) => {
                self.cursor.advance();
                let inner = self.parse_logical_operand()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            Some(TokenKind::LBracket) => self.parse_list_literal(),
            Some(TokenKind::True) => {
                self.cursor.advance();
                Ok(Operand::Value(Value::Bool(true).into_ref()))
            }
            Some(TokenKind::False) => {
                self.cursor.advance();
                Ok(Operand::Value(Value::Bool(false).into_ref()))
            }
            Some(TokenKind::Int(n)) => {
                self.cursor.advance();
                Ok(Operand::Value(Value::Int(n).into_ref()))
            }
            Some(TokenKind::Float(x)) => {
                self.cursor.advance();
                Ok(Operand::Value(Value::Float(x).into_ref()))
            }
            Some(TokenKind::Str(s)) => {
                self.cursor.advance();
                Ok(Operand::Value(Value::str(s).into_ref()))
            }
            Some(TokenKind::Minus) => self.parse_negation(),
            Some(TokenKind::Length) => {
                self.cursor.advance();
                self.cursor.expect(&TokenKind::LParen)?;
                let target = self.parse_length_arg()?;
                self.cursor.expect(&TokenKind::RParen)?;
                let frame = self.frame();
                Ok(self.node(Node::Length { target, frame }))
            }
            Some(TokenKind::Ident(name)) => {
                if matches!(self.cursor.peek_ahead(1), Some(TokenKind::LParen)) {
                    self.parse_call(name)
                } else {
                    self.cursor.advance();
                    Ok(Operand::Name(name))
                }
            }
            _ => Err(self.cursor.error_here()),
        }
    }

    /// Negative numeric literals fold at parse time; `-name` becomes the
    /// subtraction `0 - name`.
    fn parse_negation(&mut self) -> Result<Operand, SproutError> {
        self.cursor.advance(); // -
        match self.cursor.peek_kind().cloned() {
            Some(TokenKind::Int(n)) => {
                self.cursor.advance();
                Ok(Operand::Value(Value::Int(-n).into_ref()))
            }
            Some(TokenKind::Float(x)) => {
                self.cursor.advance();
                Ok(Operand::Value(Value::Float(-x).into_ref()))
            }
            Some(TokenKind::Ident(name)) => {
                self.cursor.advance();
                let frame = self.frame();
                Ok(self.node(Node::Arithmetic {
                    lhs: Operand::Value(Value::Int(0).into_ref()),
                    op: ArithOp::Sub,
                    rhs: Operand::Name(name),
                    frame,
                }))
            }
            _ => Err(self.cursor.error_here()),
        }
    }

    fn parse_list_literal(&mut self) -> Result<Operand, SproutError> {
        self.cursor.advance(); // [
        let mut elems = Vec::new();
        while !self.cursor.check(&TokenKind::RBracket) {
            elems.push(self.parse_logical_operand()?);
            if self.cursor.check(&TokenKind::Comma) {
                self.cursor.advance();
            } else {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RBracket)?;
        Ok(Operand::Value(Value::list(elems).into_ref()))
    }

    fn parse_call(&mut self, name: String) -> Result<Operand, SproutError> {
        self.cursor.advance(); // name
        self.cursor.advance(); // (
        let mut args = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            args.push(self.parse_logical_operand()?);
            if self.cursor.check(&TokenKind::Comma) {
                self.cursor.advance();
            } else {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        let frame = self.frame();
        Ok(self.node(Node::FunctionCall { name, args, frame }))
    }
}
