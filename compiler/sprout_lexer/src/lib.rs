//! Tokenizer for SproutScript source.
//!
//! The token set mirrors the language's grammar closely enough that a few
//! kinds look unusual: the call-style built-ins lex together with their
//! opening parenthesis (`split(`, `test(`, ...), `else if` is one token,
//! and `break` lexes only with its trailing semicolon. Identifiers never
//! collide with these because logos prefers the longer fixed match.

use std::fmt;

use logos::Logos;
use sprout_ir::{Span, SproutError};

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    #[regex(r"//[^\n]*", logos::skip, allow_greedy = true)]
    Comment,

    // Keywords
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("print")]
    Print,
    #[token("length")]
    Length,
    #[token("if")]
    If,
    #[token("else if")]
    ElseIf,
    #[token("else")]
    Else,
    #[token("do")]
    Do,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("break;")]
    Break,

    // Call-style built-ins, opening parenthesis included
    #[token("split(")]
    Split,
    #[token("append(")]
    Append,
    #[token("pop(")]
    Pop,
    #[token("clear(")]
    Clear,
    #[token("sort(")]
    Sort,
    #[token("delete_at(")]
    DeleteAt,
    #[token("input(")]
    Input,
    #[token("what_is(")]
    WhatIs,
    #[token("test(")]
    Test,

    // Punctuation
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("&&")]
    #[token("and")]
    AndAnd,
    #[token("||")]
    #[token("or")]
    OrOr,
    #[token("!")]
    #[token("not")]
    Bang,
    #[token("+=")]
    PlusEq,
    #[token("++")]
    PlusPlus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,

    // Literals
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len() - 1].to_string())
    })]
    Str(String),

    // Split delimiters: `' '` for whitespace, `'c'` for a single character
    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        Some(s[1..s.len() - 1].to_string())
    })]
    Delim(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| Some(lex.slice().to_string()))]
    Ident(String),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Comment => write!(f, "comment"),
            TokenKind::Function => write!(f, "function"),
            TokenKind::Return => write!(f, "return"),
            TokenKind::Print => write!(f, "print"),
            TokenKind::Length => write!(f, "length"),
            TokenKind::If => write!(f, "if"),
            TokenKind::ElseIf => write!(f, "else if"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::Do => write!(f, "do"),
            TokenKind::While => write!(f, "while"),
            TokenKind::For => write!(f, "for"),
            TokenKind::True => write!(f, "True"),
            TokenKind::False => write!(f, "False"),
            TokenKind::Break => write!(f, "break;"),
            TokenKind::Split => write!(f, "split("),
            TokenKind::Append => write!(f, "append("),
            TokenKind::Pop => write!(f, "pop("),
            TokenKind::Clear => write!(f, "clear("),
            TokenKind::Sort => write!(f, "sort("),
            TokenKind::DeleteAt => write!(f, "delete_at("),
            TokenKind::Input => write!(f, "input("),
            TokenKind::WhatIs => write!(f, "what_is("),
            TokenKind::Test => write!(f, "test("),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::AndAnd => write!(f, "&&"),
            TokenKind::OrOr => write!(f, "||"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::PlusEq => write!(f, "+="),
            TokenKind::PlusPlus => write!(f, "++"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Float(x) => write!(f, "{x}"),
            TokenKind::Int(n) => write!(f, "{n}"),
            TokenKind::Str(s) => write!(f, "\"{s}\""),
            TokenKind::Delim(d) => write!(f, "'{d}'"),
            TokenKind::Ident(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, SproutError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(kind) => tokens.push(Token { kind, span }),
            Err(()) => {
                return Err(SproutError::UnexpectedToken {
                    found: source[lexer.span()].to_string(),
                    span,
                })
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        match tokenize(source) {
            Ok(tokens) => tokens.into_iter().map(|t| t.kind).collect(),
            Err(e) => panic!("lex failure: {e}"),
        }
    }

    #[test]
    fn assignment_statement() {
        assert_eq!(
            kinds("count = 5;"),
            vec![
                TokenKind::Ident("count".into()),
                TokenKind::Eq,
                TokenKind::Int(5),
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn floats_win_over_ints() {
        assert_eq!(
            kinds("2.5 25"),
            vec![TokenKind::Float(2.5), TokenKind::Int(25)]
        );
    }

    #[test]
    fn string_literal_drops_the_quotes() {
        assert_eq!(kinds("\"hello world\""), vec![TokenKind::Str("hello world".into())]);
    }

    #[test]
    fn else_if_is_one_token() {
        assert_eq!(
            kinds("else if else"),
            vec![TokenKind::ElseIf, TokenKind::Else]
        );
    }

    #[test]
    fn break_lexes_with_its_semicolon() {
        assert_eq!(kinds("break;"), vec![TokenKind::Break]);
    }

    #[test]
    fn builtin_openers_take_the_parenthesis() {
        assert_eq!(
            kinds("split(words, ' ');"),
            vec![
                TokenKind::Split,
                TokenKind::Ident("words".into()),
                TokenKind::Comma,
                TokenKind::Delim(" ".into()),
                TokenKind::RParen,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn builtin_name_without_parenthesis_is_an_identifier() {
        assert_eq!(kinds("pop"), vec![TokenKind::Ident("pop".into())]);
    }

    #[test]
    fn keyword_prefixes_stay_identifiers() {
        assert_eq!(
            kinds("iffy fortune doubt"),
            vec![
                TokenKind::Ident("iffy".into()),
                TokenKind::Ident("fortune".into()),
                TokenKind::Ident("doubt".into()),
            ]
        );
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        assert_eq!(
            kinds("x = 1; // trailing note\ny = 2;"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Eq,
                TokenKind::Int(1),
                TokenKind::Semicolon,
                TokenKind::Ident("y".into()),
                TokenKind::Eq,
                TokenKind::Int(2),
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn compound_operators_bind_before_simple_ones() {
        assert_eq!(
            kinds("i++ j += 1 a == b"),
            vec![
                TokenKind::Ident("i".into()),
                TokenKind::PlusPlus,
                TokenKind::Ident("j".into()),
                TokenKind::PlusEq,
                TokenKind::Int(1),
                TokenKind::Ident("a".into()),
                TokenKind::EqEq,
                TokenKind::Ident("b".into()),
            ]
        );
    }

    #[test]
    fn word_operators_alias_the_symbolic_forms() {
        assert_eq!(
            kinds("a and b or not c"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::AndAnd,
                TokenKind::Ident("b".into()),
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::Ident("c".into()),
            ]
        );
    }

    #[test]
    fn unexpected_character_is_a_fatal_error() {
        let err = tokenize("x = 1 @ 2;");
        assert!(matches!(
            err,
            Err(SproutError::UnexpectedToken { found, .. }) if found == "@"
        ));
    }
}
