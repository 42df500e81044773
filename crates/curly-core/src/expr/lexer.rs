//! Tokenizer for the expression language
//!
//! Single forward pass over the source, producing tokens with the 1-based
//! column they start at (used in syntax errors).

use super::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    Undefined,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    AndAnd,
    OrOr,
    Pipe,
    Question,
    Colon,
    Comma,
    Dot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

impl TokenKind {
    /// Source-like rendering for error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => crate::value::format_number(*n),
            TokenKind::Str(s) => format!("'{}'", s),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::True => "true".to_string(),
            TokenKind::False => "false".to_string(),
            TokenKind::Null => "null".to_string(),
            TokenKind::Undefined => "undefined".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Percent => "%".to_string(),
            TokenKind::Bang => "!".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::Gt => ">".to_string(),
            TokenKind::LtEq => "<=".to_string(),
            TokenKind::GtEq => ">=".to_string(),
            TokenKind::EqEq => "==".to_string(),
            TokenKind::NotEq => "!=".to_string(),
            TokenKind::EqEqEq => "===".to_string(),
            TokenKind::NotEqEq => "!==".to_string(),
            TokenKind::AndAnd => "&&".to_string(),
            TokenKind::OrOr => "||".to_string(),
            TokenKind::Pipe => "|".to_string(),
            TokenKind::Question => "?".to_string(),
            TokenKind::Colon => ":".to_string(),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Dot => ".".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::LBrace => "{".to_string(),
            TokenKind::RBrace => "}".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// 1-based character column
    pub column: usize,
}

pub(crate) struct Lexer<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the whole source
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pos += 1;
                continue;
            }

            let column = self.pos + 1;
            let kind = if ch.is_ascii_digit()
                || (ch == '.' && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()))
            {
                self.lex_number()?
            } else if ch == '\'' || ch == '"' {
                self.lex_string(ch)?
            } else if is_ident_start(ch) {
                self.lex_ident()
            } else {
                self.lex_operator(ch)?
            };

            tokens.push(Token { kind, column });
        }

        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn lex_number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.pos += 1;
        }

        // Exponent: 1e3, 2.5E-4
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
            if self.peek_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1 + sign;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else {
                return Err(self.invalid_number(start));
            }
        }

        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| self.invalid_number(start))
    }

    fn invalid_number(&self, start: usize) -> ParseError {
        let end = (self.pos + 1).min(self.chars.len());
        ParseError::InvalidNumber {
            literal: self.chars[start..end].iter().collect(),
            column: start + 1,
            expression: self.source.to_string(),
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();

        loop {
            let Some(ch) = self.peek() else {
                return Err(ParseError::UnterminatedString {
                    column: start + 1,
                    expression: self.source.to_string(),
                });
            };
            self.pos += 1;

            if ch == quote {
                return Ok(TokenKind::Str(value));
            }
            if ch != '\\' {
                value.push(ch);
                continue;
            }

            let escape_column = self.pos;
            let Some(escaped) = self.peek() else {
                return Err(ParseError::UnterminatedString {
                    column: start + 1,
                    expression: self.source.to_string(),
                });
            };
            self.pos += 1;

            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                'f' => value.push('\u{000C}'),
                'v' => value.push('\u{000B}'),
                'u' => {
                    let hex: String = self.chars.iter().skip(self.pos).take(4).collect();
                    let decoded = if hex.len() == 4 {
                        u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                    } else {
                        None
                    };
                    match decoded {
                        Some(c) => {
                            value.push(c);
                            self.pos += 4;
                        }
                        None => {
                            return Err(ParseError::InvalidEscape {
                                escape: format!("u{}", hex),
                                column: escape_column,
                                expression: self.source.to_string(),
                            });
                        }
                    }
                }
                other => value.push(other),
            }
        }
    }

    fn lex_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.pos += 1;
        }
        let ident: String = self.chars[start..self.pos].iter().collect();

        match ident.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "undefined" => TokenKind::Undefined,
            _ => TokenKind::Ident(ident),
        }
    }

    fn lex_operator(&mut self, ch: char) -> Result<TokenKind, ParseError> {
        let next = self.peek_at(1);
        let third = self.peek_at(2);

        let (kind, width) = match (ch, next, third) {
            ('=', Some('='), Some('=')) => (TokenKind::EqEqEq, 3),
            ('!', Some('='), Some('=')) => (TokenKind::NotEqEq, 3),
            ('=', Some('='), _) => (TokenKind::EqEq, 2),
            ('!', Some('='), _) => (TokenKind::NotEq, 2),
            ('<', Some('='), _) => (TokenKind::LtEq, 2),
            ('>', Some('='), _) => (TokenKind::GtEq, 2),
            ('&', Some('&'), _) => (TokenKind::AndAnd, 2),
            ('|', Some('|'), _) => (TokenKind::OrOr, 2),
            ('+', _, _) => (TokenKind::Plus, 1),
            ('-', _, _) => (TokenKind::Minus, 1),
            ('*', _, _) => (TokenKind::Star, 1),
            ('/', _, _) => (TokenKind::Slash, 1),
            ('%', _, _) => (TokenKind::Percent, 1),
            ('!', _, _) => (TokenKind::Bang, 1),
            ('<', _, _) => (TokenKind::Lt, 1),
            ('>', _, _) => (TokenKind::Gt, 1),
            ('|', _, _) => (TokenKind::Pipe, 1),
            ('?', _, _) => (TokenKind::Question, 1),
            (':', _, _) => (TokenKind::Colon, 1),
            (',', _, _) => (TokenKind::Comma, 1),
            ('.', _, _) => (TokenKind::Dot, 1),
            ('(', _, _) => (TokenKind::LParen, 1),
            (')', _, _) => (TokenKind::RParen, 1),
            ('[', _, _) => (TokenKind::LBracket, 1),
            (']', _, _) => (TokenKind::RBracket, 1),
            ('{', _, _) => (TokenKind::LBrace, 1),
            ('}', _, _) => (TokenKind::RBrace, 1),
            _ => {
                return Err(ParseError::UnexpectedCharacter {
                    ch,
                    column: self.pos + 1,
                    expression: self.source.to_string(),
                });
            }
        };

        self.pos += width;
        Ok(kind)
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}
