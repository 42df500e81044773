//! Expression language used inside interpolation markers
//!
//! The interpolation compiler only depends on the [`ExpressionParser`] and
//! [`Program`] traits. [`Parser`] is the stock implementation: a small
//! JavaScript-flavoured language with member access, arithmetic, comparison,
//! logical and ternary operators, literals and `|` filters.
//!
//! ```
//! use curly_core::expr::{ExpressionParser, Parser};
//! use curly_core::Value;
//!
//! let program = Parser::new().parse("1 + 1").unwrap();
//! assert_eq!(program.evaluate(&Value::Undefined).unwrap(), Value::Number(2.0));
//! ```

mod ast;
pub mod error;
mod eval;
pub mod filters;
mod lexer;
mod parser;

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::value::Value;

pub use ast::{BinaryOp, Expr, FilterCall, UnaryOp};
pub use error::{EvalError, ParseError};
pub use filters::{FilterFn, FilterRegistry};

/// A parsed, evaluable expression
pub trait Program: Send + Sync + fmt::Debug {
    /// Evaluate against a context
    fn evaluate(&self, ctx: &dyn Context) -> Result<Value, EvalError>;

    /// The source text the program was parsed from
    fn source(&self) -> &str;

    /// Whether the result is independent of the context
    fn is_constant(&self) -> bool {
        false
    }
}

/// Turns expression sources into programs
pub trait ExpressionParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<Arc<dyn Program>, ParseError>;
}

/// The stock expression parser
#[derive(Debug, Clone)]
pub struct Parser {
    filters: FilterRegistry,
}

impl Parser {
    /// Parser with the built-in filters
    pub fn new() -> Self {
        Self::with_filters(FilterRegistry::with_builtins())
    }

    pub fn with_filters(filters: FilterRegistry) -> Self {
        Self { filters }
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Parse into a concrete [`Expression`]
    pub fn parse_expression(&self, source: &str) -> Result<Expression, ParseError> {
        let ast = parser::ExprParser::new(source, &self.filters)?.parse()?;
        Ok(Expression {
            source: source.to_string(),
            ast,
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionParser for Parser {
    fn parse(&self, source: &str) -> Result<Arc<dyn Program>, ParseError> {
        Ok(Arc::new(self.parse_expression(source)?))
    }
}

/// An expression parsed by [`Parser`]
#[derive(Debug, Clone)]
pub struct Expression {
    source: String,
    ast: Expr,
}

impl Expression {
    pub fn ast(&self) -> &Expr {
        &self.ast
    }
}

impl Program for Expression {
    fn evaluate(&self, ctx: &dyn Context) -> Result<Value, EvalError> {
        eval::evaluate(&self.ast, ctx)
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn is_constant(&self) -> bool {
        self.ast.is_constant()
    }
}
