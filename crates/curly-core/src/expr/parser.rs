//! Precedence-climbing parser for the expression language
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! filter_chain := conditional ( '|' IDENT ( ':' conditional )* )*
//! conditional  := binary ( '?' conditional ':' conditional )?
//! binary       := unary ( BINOP unary )*        (precedence climbing)
//! unary        := ( '!' | '-' | '+' ) unary | postfix
//! postfix      := primary ( '.' IDENT | '[' filter_chain ']' )*
//! primary      := literal | IDENT | '(' filter_chain ')' | array | object
//! ```

use std::sync::Arc;

use super::ast::{BinaryOp, Expr, FilterCall, UnaryOp};
use super::error::ParseError;
use super::filters::FilterRegistry;
use super::lexer::{Lexer, Token, TokenKind};
use crate::value::Value;

/// Lowest binary precedence (`||`)
const MIN_PRECEDENCE: u8 = 1;

/// Maximum nesting of unary operands and conditionals; bounds parse and
/// evaluation recursion
pub(crate) const MAX_DEPTH: usize = 128;

fn binary_op(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let op = match kind {
        TokenKind::OrOr => (BinaryOp::Or, 1),
        TokenKind::AndAnd => (BinaryOp::And, 2),
        TokenKind::EqEq => (BinaryOp::Eq, 3),
        TokenKind::NotEq => (BinaryOp::NotEq, 3),
        TokenKind::EqEqEq => (BinaryOp::StrictEq, 3),
        TokenKind::NotEqEq => (BinaryOp::StrictNotEq, 3),
        TokenKind::Lt => (BinaryOp::Lt, 4),
        TokenKind::Gt => (BinaryOp::Gt, 4),
        TokenKind::LtEq => (BinaryOp::LtEq, 4),
        TokenKind::GtEq => (BinaryOp::GtEq, 4),
        TokenKind::Plus => (BinaryOp::Add, 5),
        TokenKind::Minus => (BinaryOp::Sub, 5),
        TokenKind::Star => (BinaryOp::Mul, 6),
        TokenKind::Slash => (BinaryOp::Div, 6),
        TokenKind::Percent => (BinaryOp::Rem, 6),
        _ => return None,
    };
    Some(op)
}

pub(crate) struct ExprParser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    filters: &'a FilterRegistry,
}

impl<'a> ExprParser<'a> {
    pub fn new(source: &'a str, filters: &'a FilterRegistry) -> Result<Self, ParseError> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
            depth: 0,
            filters,
        })
    }

    /// Parse the whole source; an empty source yields `undefined`
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        if self.tokens.is_empty() {
            return Ok(Expr::Literal(Value::Undefined));
        }

        let expr = self.parse_filter_chain()?;
        if let Some(token) = self.peek() {
            return Err(self.unexpected(token, "end of expression"));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek().is_some_and(|t| &t.kind == kind)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.bump() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(self.unexpected(&token, &format!("'{}'", kind.describe()))),
            None => Err(self.end(&format!("'{}'", kind.describe()))),
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep {
                limit: MAX_DEPTH,
                expression: self.source.to_string(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn unexpected(&self, token: &Token, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            token: token.kind.describe(),
            expected: expected.to_string(),
            column: token.column,
            expression: self.source.to_string(),
        }
    }

    fn end(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedEnd {
            expected: expected.to_string(),
            expression: self.source.to_string(),
        }
    }

    fn parse_filter_chain(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_conditional()?;

        while self.check(&TokenKind::Pipe) {
            self.bump();
            let name = match self.bump() {
                Some(Token {
                    kind: TokenKind::Ident(name),
                    ..
                }) => name,
                Some(token) => return Err(self.unexpected(&token, "filter name")),
                None => return Err(self.end("filter name")),
            };

            let func = self
                .filters
                .get(&name)
                .ok_or_else(|| ParseError::UnknownFilter {
                    name: name.clone(),
                    expression: self.source.to_string(),
                })?;

            let mut args = Vec::new();
            while self.check(&TokenKind::Colon) {
                self.bump();
                args.push(self.parse_conditional()?);
            }

            expr = Expr::Filter {
                input: Box::new(expr),
                call: Arc::new(FilterCall { name, func, args }),
            };
        }

        Ok(expr)
    }

    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let expr = self.parse_conditional_inner();
        self.depth -= 1;
        expr
    }

    fn parse_conditional_inner(&mut self) -> Result<Expr, ParseError> {
        let test = self.parse_binary(MIN_PRECEDENCE)?;

        if !self.check(&TokenKind::Question) {
            return Ok(test);
        }
        self.bump();
        let consequent = self.parse_conditional()?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_conditional()?;

        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    fn parse_binary(&mut self, precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some((op, token_prec)) = self.peek().and_then(|t| binary_op(&t.kind)) {
            if token_prec < precedence {
                break;
            }
            self.bump();

            // Left associative: the right operand binds tighter
            let right = self.parse_binary(token_prec + 1)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let expr = self.parse_unary_inner();
        self.depth -= 1;
        expr
    }

    fn parse_unary_inner(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Bang) => UnaryOp::Not,
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Plus) => UnaryOp::Plus,
            _ => return self.parse_postfix(),
        };
        self.bump();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Dot) => {
                    self.bump();
                    let property = match self.bump() {
                        Some(Token {
                            kind: TokenKind::Ident(name),
                            ..
                        }) => name,
                        Some(token) => return Err(self.unexpected(&token, "property name")),
                        None => return Err(self.end("property name")),
                    };
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                    };
                }
                Some(TokenKind::LBracket) => {
                    self.bump();
                    let index = self.parse_filter_chain()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.bump() else {
            return Err(self.end("expression"));
        };

        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::String(s))),
            TokenKind::True => Ok(Expr::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Value::Bool(false))),
            TokenKind::Null => Ok(Expr::Literal(Value::Null)),
            TokenKind::Undefined => Ok(Expr::Literal(Value::Undefined)),
            TokenKind::Ident(name) => Ok(Expr::Identifier(name)),
            TokenKind::LParen => {
                let expr = self.parse_filter_chain()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            _ => Err(self.unexpected(&token, "expression")),
        }
    }

    /// `[a, b, c]`, opening bracket already consumed; a trailing comma is allowed
    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            items.push(self.parse_filter_chain()?);
            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.bump();
        }
        self.expect(TokenKind::RBracket)?;
        Ok(Expr::Array(items))
    }

    /// `{key: value, 'quoted key': value}`, opening brace already consumed
    fn parse_object(&mut self) -> Result<Expr, ParseError> {
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let key = match self.bump() {
                Some(Token {
                    kind: TokenKind::Ident(name),
                    ..
                }) => name,
                Some(Token {
                    kind: TokenKind::Str(s),
                    ..
                }) => s,
                Some(Token {
                    kind: TokenKind::Number(n),
                    ..
                }) => crate::value::format_number(n),
                Some(token) => return Err(self.unexpected(&token, "object key")),
                None => return Err(self.end("object key")),
            };
            self.expect(TokenKind::Colon)?;
            let value = self.parse_filter_chain()?;
            entries.push((key, value));

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.bump();
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Expr::Object(entries))
    }
}
