//! Expression syntax tree

use std::fmt;
use std::sync::Arc;

use super::filters::FilterFn;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    And,
    Or,
}

/// A filter resolved at parse time
#[derive(Clone)]
pub struct FilterCall {
    pub name: String,
    pub func: FilterFn,
    pub args: Vec<Expr>,
}

impl fmt::Debug for FilterCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCall")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Value),
    Identifier(String),
    Array(Vec<Expr>),
    Object(Vec<(String, Expr)>),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Filter {
        input: Box<Expr>,
        call: Arc<FilterCall>,
    },
}

impl Expr {
    /// Whether the expression is a constant (no identifiers, no filters)
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Literal(_) => true,
            Expr::Identifier(_) | Expr::Filter { .. } => false,
            Expr::Array(items) => items.iter().all(Expr::is_constant),
            Expr::Object(entries) => entries.iter().all(|(_, e)| e.is_constant()),
            Expr::Member { object, .. } => object.is_constant(),
            Expr::Index { object, index } => object.is_constant() && index.is_constant(),
            Expr::Unary { operand, .. } => operand.is_constant(),
            Expr::Binary { left, right, .. } => left.is_constant() && right.is_constant(),
            Expr::Conditional {
                test,
                consequent,
                alternate,
            } => test.is_constant() && consequent.is_constant() && alternate.is_constant(),
        }
    }
}
