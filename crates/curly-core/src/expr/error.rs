//! Expression error types

use thiserror::Error;

/// Errors raised while parsing an expression source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("LEXER_ERROR: unexpected character '{ch}' at column {column} in expression [{expression}]")]
    UnexpectedCharacter {
        ch: char,
        column: usize,
        expression: String,
    },

    #[error("LEXER_ERROR: unterminated string starting at column {column} in expression [{expression}]")]
    UnterminatedString { column: usize, expression: String },

    #[error("LEXER_ERROR: invalid escape '\\{escape}' at column {column} in expression [{expression}]")]
    InvalidEscape {
        escape: String,
        column: usize,
        expression: String,
    },

    #[error("LEXER_ERROR: invalid number '{literal}' at column {column} in expression [{expression}]")]
    InvalidNumber {
        literal: String,
        column: usize,
        expression: String,
    },

    #[error("SYNTAX_ERROR: token '{token}' is unexpected, expecting {expected} at column {column} of the expression [{expression}]")]
    UnexpectedToken {
        token: String,
        expected: String,
        column: usize,
        expression: String,
    },

    #[error("SYNTAX_ERROR: unexpected end of expression [{expression}], expecting {expected}")]
    UnexpectedEnd { expected: String, expression: String },

    #[error("TOO_DEEP: expression [{expression}] nests deeper than {limit} levels")]
    TooDeep { limit: usize, expression: String },

    #[error("UNKNOWN_FILTER: no filter named '{name}' in expression [{expression}]")]
    UnknownFilter { name: String, expression: String },
}

/// Errors raised while evaluating a parsed expression
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("filter '{name}' failed: {message}")]
    Filter { name: String, message: String },

    #[error("{0}")]
    Custom(String),
}

impl EvalError {
    /// Convenience constructor for filter implementations
    pub fn filter(name: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::Filter {
            name: name.into(),
            message: message.into(),
        }
    }
}
