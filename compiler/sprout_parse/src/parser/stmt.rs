//! Statement and block productions.

use std::rc::Rc;

use sprout_ir::{
    ArithOp, AssignTarget, Condition, FunctionDef, IfArm, Node, Operand, SproutError, Value,
};
use sprout_lexer::TokenKind;

use super::Parser;

pub(super) fn is_builtin_opener(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Split
            | TokenKind::Append
            | TokenKind::Pop
            | TokenKind::Clear
            | TokenKind::Sort
            | TokenKind::DeleteAt
            | TokenKind::Input
            | TokenKind::WhatIs
            | TokenKind::Test
    )
}

/// Assignable names start with a lowercase letter; the lexer already
/// restricts the rest to letters, digits and underscores.
fn validate_var_name(name: &str) -> Result<(), SproutError> {
    if name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        Ok(())
    } else {
        Err(SproutError::VariableNameInvalid {
            name: name.to_string(),
        })
    }
}

impl Parser {
    /// `{ row* }` parsed into the currently open block.
    fn parse_block_body(&mut self) -> Result<(), SproutError> {
        self.cursor.expect(&TokenKind::LBrace)?;
        while !self.cursor.check(&TokenKind::RBrace) {
            if self.cursor.at_end() {
                return Err(SproutError::UnexpectedEof);
            }
            self.parse_row()?;
        }
        self.cursor.expect(&TokenKind::RBrace)?;
        Ok(())
    }

    pub(super) fn parse_if(&mut self) -> Result<(), SproutError> {
        self.cursor.advance();
        self.push_block();
        self.cursor.expect(&TokenKind::LParen)?;
        let condition = self.parse_logical_operand()?;
        self.cursor.expect(&TokenKind::RParen)?;
        self.parse_block_body()?;
        let (body, frame) = self.pop_block();
        let arm = Rc::new(IfArm::new(Condition::Test(condition), frame, body));
        self.append(Node::If(arm));
        Ok(())
    }

    pub(super) fn parse_else_if(&mut self) -> Result<(), SproutError> {
        self.cursor.advance();
        let head = self.chain_head()?;
        self.push_block();
        self.cursor.expect(&TokenKind::LParen)?;
        let condition = self.parse_logical_operand()?;
        self.cursor.expect(&TokenKind::RParen)?;
        self.parse_block_body()?;
        let (body, frame) = self.pop_block();
        head.append_statement(Rc::new(IfArm::new(Condition::Test(condition), frame, body)));
        Ok(())
    }

    pub(super) fn parse_else(&mut self) -> Result<(), SproutError> {
        self.cursor.advance();
        let head = self.chain_head()?;
        self.push_block();
        self.parse_block_body()?;
        let (body, frame) = self.pop_block();
        head.append_statement(Rc::new(IfArm::new(Condition::Always, frame, body)));
        Ok(())
    }

    pub(super) fn parse_while(&mut self) -> Result<(), SproutError> {
        self.cursor.advance();
        self.push_block();
        self.cursor.expect(&TokenKind::LParen)?;
        let condition = self.parse_logical_operand()?;
        self.cursor.expect(&TokenKind::RParen)?;
        self.parse_block_body()?;
        let (body, frame) = self.pop_block();
        self.append(Node::While {
            condition,
            frame,
            body,
        });
        Ok(())
    }

    pub(super) fn parse_do_while(&mut self) -> Result<(), SproutError> {
        self.cursor.advance();
        self.push_block();
        self.parse_block_body()?;
        self.cursor.expect(&TokenKind::While)?;
        self.cursor.expect(&TokenKind::LParen)?;
        let condition = self.parse_logical_operand()?;
        self.cursor.expect(&TokenKind::RParen)?;
        self.cursor.expect(&TokenKind::Semicolon)?;
        let (body, frame) = self.pop_block();
        self.append(Node::DoWhile {
            condition,
            frame,
            body,
        });
        Ok(())
    }

    pub(super) fn parse_for(&mut self) -> Result<(), SproutError> {
        self.cursor.advance();
        self.push_block();
        self.cursor.expect(&TokenKind::LParen)?;

        let loop_var = self.cursor.expect_ident()?;
        validate_var_name(&loop_var)?;
        self.cursor.expect(&TokenKind::Eq)?;
        let init_value = self.parse_logical_operand()?;
        let init = Rc::new(Node::Assign {
            target: AssignTarget::Name(loop_var.clone()),
            value: init_value,
            frame: self.frame(),
        });
        self.cursor.expect(&TokenKind::Semicolon)?;

        let condition = self.parse_logical_operand()?;
        self.cursor.expect(&TokenKind::Semicolon)?;

        // The increment is an expression (`i + 1`, `i++`); an `i = ` prefix
        // is tolerated and the right-hand side taken as the increment.
        if matches!(self.cursor.peek_kind(), Some(TokenKind::Ident(_)))
            && matches!(self.cursor.peek_ahead(1), Some(TokenKind::Eq))
        {
            self.cursor.advance();
            self.cursor.advance();
        }
        let increment = self.parse_expr()?;
        self.cursor.expect(&TokenKind::RParen)?;

        self.parse_block_body()?;
        let (body, frame) = self.pop_block();
        self.append(Node::For {
            init,
            condition,
            increment,
            loop_var,
            frame,
            body,
        });
        Ok(())
    }

    pub(super) fn parse_function(&mut self) -> Result<(), SproutError> {
        if !self.at_top_level() {
            return Err(SproutError::NestedFunction);
        }
        self.cursor.advance();
        let name = self.cursor.expect_ident()?;

        self.cursor.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.check(&TokenKind::RParen) {
            params.push(self.cursor.expect_ident()?);
            if self.cursor.check(&TokenKind::Comma) {
                self.cursor.advance();
            } else {
                break;
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;

        self.push_block();
        self.in_function = true;
        let body_result = self.parse_block_body();
        self.in_function = false;
        body_result?;
        let (body, frame) = self.pop_block();

        tracing::debug!(name = %name, params = params.len(), "parsed function definition");
        let def = Rc::new(FunctionDef {
            name,
            params,
            frame,
            body,
        });
        self.root.frame.borrow().define_function(def);
        Ok(())
    }

    pub(super) fn parse_return(&mut self) -> Result<(), SproutError> {
        if !self.in_function {
            return Err(SproutError::ReturnOutsideFunction);
        }
        self.cursor.advance();
        let operand = self.parse_logical_operand()?;
        self.cursor.expect(&TokenKind::Semicolon)?;
        let frame = self.frame();
        self.append(Node::Return { operand, frame });
        Ok(())
    }

    pub(super) fn parse_print(&mut self) -> Result<(), SproutError> {
        self.cursor.advance();
        self.cursor.expect(&TokenKind::LParen)?;
        let operand = self.parse_assign_rhs()?;
        self.cursor.expect(&TokenKind::RParen)?;
        self.cursor.expect(&TokenKind::Semicolon)?;
        let frame = self.frame();
        self.append(Node::Print { operand, frame });
        Ok(())
    }

    /// A row starting with an identifier: plain assignment, compound
    /// assignment, list-slot assignment, or a bare expression row.
    pub(super) fn parse_var_row(&mut self) -> Result<(), SproutError> {
        match self.cursor.peek_ahead(1) {
            Some(TokenKind::Eq) => {
                let name = self.cursor.expect_ident()?;
                validate_var_name(&name)?;
                self.cursor.advance();
                let value = self.parse_assign_rhs()?;
                self.cursor.expect(&TokenKind::Semicolon)?;
                let frame = self.frame();
                self.append(Node::Assign {
                    target: AssignTarget::Name(name),
                    value,
                    frame,
                });
                Ok(())
            }
            Some(TokenKind::PlusEq) => {
                let name = self.cursor.expect_ident()?;
                validate_var_name(&name)?;
                self.cursor.advance();
                let rhs = self.parse_expr()?;
                let frame = self.frame();
                let sum = Rc::new(Node::Arithmetic {
                    lhs: Operand::Name(name.clone()),
                    op: ArithOp::Add,
                    rhs,
                    frame: frame.clone(),
                });
                self.cursor.expect(&TokenKind::Semicolon)?;
                self.append(Node::Assign {
                    target: AssignTarget::Name(name),
                    value: Operand::Node(sum),
                    frame,
                });
                Ok(())
            }
            Some(TokenKind::LBracket) => {
                let name = self.cursor.expect_ident()?;
                validate_var_name(&name)?;
                self.cursor.advance();
                let index = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RBracket)?;
                if self.cursor.check(&TokenKind::Eq) {
                    self.cursor.advance();
                    let value = self.parse_assign_rhs()?;
                    self.cursor.expect(&TokenKind::Semicolon)?;
                    let frame = self.frame();
                    self.append(Node::Assign {
                        target: AssignTarget::Index { list: name, index },
                        value,
                        frame,
                    });
                } else {
                    // Bare index read; parses, has no effect.
                    self.cursor.expect(&TokenKind::Semicolon)?;
                }
                Ok(())
            }
            _ => {
                let operand = self.parse_logical_operand()?;
                self.cursor.expect(&TokenKind::Semicolon)?;
                self.append_if_call(operand);
                Ok(())
            }
        }
    }

    /// Assignment right-hand sides admit the call-style built-ins on top of
    /// ordinary expressions.
    fn parse_assign_rhs(&mut self) -> Result<Operand, SproutError> {
        match self.cursor.peek_kind() {
            Some(kind) if is_builtin_opener(kind) => {
                let node = self.parse_builtin()?;
                Ok(Operand::Node(Rc::new(node)))
            }
            _ => self.parse_logical_operand(),
        }
    }

    /// One call-style built-in, cursor on its opener token (which already
    /// contains the opening parenthesis).
    pub(super) fn parse_builtin(&mut self) -> Result<Node, SproutError> {
        let Some(opener) = self.cursor.advance().map(|t| t.kind) else {
            return Err(SproutError::UnexpectedEof);
        };
        let frame = self.frame();

        let node = match opener {
            TokenKind::Split => {
                let target = self.parse_str_arg("split")?;
                self.cursor.expect(&TokenKind::Comma)?;
                let delimiter = match self.cursor.advance().map(|t| t.kind) {
                    Some(TokenKind::Delim(d)) => d,
                    _ => return Err(SproutError::BuiltinArityOrType { builtin: "split" }),
                };
                self.cursor.expect(&TokenKind::RParen)?;
                Node::Split {
                    target,
                    delimiter,
                    frame,
                }
            }
            TokenKind::Append => {
                let list = self.parse_list_arg("append")?;
                self.cursor.expect(&TokenKind::Comma)?;
                let item = self.parse_logical_operand()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Node::Append { list, item, frame }
            }
            TokenKind::Pop => {
                let list = self.parse_list_arg("pop")?;
                self.cursor.expect(&TokenKind::RParen)?;
                Node::Pop { list, frame }
            }
            TokenKind::Clear => {
                let list = self.parse_list_arg("clear")?;
                self.cursor.expect(&TokenKind::RParen)?;
                Node::Clear { list, frame }
            }
            TokenKind::Sort => {
                let list = self.parse_list_arg("sort")?;
                self.cursor.expect(&TokenKind::RParen)?;
                Node::Sort { list, frame }
            }
            TokenKind::DeleteAt => {
                let list = self.parse_list_arg("delete_at")?;
                self.cursor.expect(&TokenKind::Comma)?;
                let index = self.parse_logical_operand()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Node::DeleteAt { list, index, frame }
            }
            TokenKind::Input => {
                let prompt = self.parse_logical_operand()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Node::Input { prompt, frame }
            }
            TokenKind::WhatIs => {
                let target = self.parse_logical_operand()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Node::WhatIs { target, frame }
            }
            TokenKind::Test => {
                let lhs = self.parse_logical_operand()?;
                self.cursor.expect(&TokenKind::Comma)?;
                let rhs = self.parse_logical_operand()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Node::Test { lhs, rhs, frame }
            }
            _ => return Err(self.cursor.error_here()),
        };
        Ok(node)
    }

    /// List-position argument: a variable name or a list literal.
    fn parse_list_arg(&mut self, builtin: &'static str) -> Result<Operand, SproutError> {
        match self.cursor.peek_kind() {
            Some(TokenKind::Ident(_)) => Ok(Operand::Name(self.cursor.expect_ident()?)),
            Some(TokenKind::LBracket) => self.parse_primary(),
            _ => Err(SproutError::BuiltinArityOrType { builtin }),
        }
    }

    /// String-position argument: a variable name or a string literal.
    fn parse_str_arg(&mut self, builtin: &'static str) -> Result<Operand, SproutError> {
        match self.cursor.peek_kind().cloned() {
            Some(TokenKind::Ident(_)) => Ok(Operand::Name(self.cursor.expect_ident()?)),
            Some(TokenKind::Str(s)) => {
                self.cursor.advance();
                Ok(Operand::Value(Value::str(s).into_ref()))
            }
            _ => Err(SproutError::BuiltinArityOrType { builtin }),
        }
    }

    /// `length` argument: a name or a string/list literal; anything else is
    /// rejected here rather than at run time.
    pub(super) fn parse_length_arg(&mut self) -> Result<Operand, SproutError> {
        match self.cursor.peek_kind().cloned() {
            Some(TokenKind::Ident(_)) => Ok(Operand::Name(self.cursor.expect_ident()?)),
            Some(TokenKind::Str(s)) => {
                self.cursor.advance();
                Ok(Operand::Value(Value::str(s).into_ref()))
            }
            Some(TokenKind::LBracket) => self.parse_primary(),
            _ => Err(SproutError::BuiltinArityOrType { builtin: "length" }),
        }
    }
}
