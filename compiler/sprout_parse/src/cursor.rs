//! Token cursor.

use sprout_lexer::{Token, TokenKind};
use sprout_ir::SproutError;

pub struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Cursor { tokens, pos: 0 }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    pub fn peek_ahead(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + n).map(|t| &t.kind)
    }

    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Whether the current token has the same kind as `kind`, payloads
    /// ignored. Only meaningful for payload-free kinds.
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind()
            .is_some_and(|k| std::mem::discriminant(k) == std::mem::discriminant(kind))
    }

    pub fn expect(&mut self, kind: &TokenKind) -> Result<Token, SproutError> {
        if self.check(kind) {
            self.advance().ok_or(SproutError::UnexpectedEof)
        } else {
            Err(self.error_here())
        }
    }

    pub fn expect_ident(&mut self) -> Result<String, SproutError> {
        match self.peek_kind() {
            Some(TokenKind::Ident(_)) => match self.advance().map(|t| t.kind) {
                Some(TokenKind::Ident(name)) => Ok(name),
                _ => Err(SproutError::UnexpectedEof),
            },
            _ => Err(self.error_here()),
        }
    }

    /// The error for "this token can't start/continue what we're parsing".
    pub fn error_here(&self) -> SproutError {
        match self.peek() {
            Some(token) => SproutError::UnexpectedToken {
                found: token.kind.to_string(),
                span: token.span,
            },
            None => SproutError::UnexpectedEof,
        }
    }
}
