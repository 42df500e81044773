//! Tree-walking evaluator
//!
//! Semantics follow the forgiving rules of template expressions: reading a
//! property of `undefined` or `null` yields `undefined` instead of failing,
//! and `+` ignores an undefined operand.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::error::EvalError;
use crate::context::Context;
use crate::value::Value;

pub(crate) fn evaluate(expr: &Expr, ctx: &dyn Context) -> Result<Value, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Identifier(name) => Ok(ctx.lookup(name).cloned().unwrap_or(Value::Undefined)),
        Expr::Array(items) => items
            .iter()
            .map(|item| evaluate(item, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Expr::Object(entries) => {
            let mut map = BTreeMap::new();
            for (key, value) in entries {
                map.insert(key.clone(), evaluate(value, ctx)?);
            }
            Ok(Value::Object(map))
        }
        Expr::Member { object, property } => {
            let object = evaluate(object, ctx)?;
            Ok(member(&object, property))
        }
        Expr::Index { object, index } => {
            let object = evaluate(object, ctx)?;
            let index = evaluate(index, ctx)?;
            Ok(index_value(&object, &index))
        }
        Expr::Unary { op, operand } => {
            let operand = evaluate(operand, ctx)?;
            Ok(unary(*op, &operand))
        }
        Expr::Binary { left, op, right } => match op {
            BinaryOp::And => {
                let left = evaluate(left, ctx)?;
                if left.is_truthy() {
                    evaluate(right, ctx)
                } else {
                    Ok(left)
                }
            }
            BinaryOp::Or => {
                let left = evaluate(left, ctx)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    evaluate(right, ctx)
                }
            }
            _ => {
                let left = evaluate(left, ctx)?;
                let right = evaluate(right, ctx)?;
                Ok(binary(*op, &left, &right))
            }
        },
        Expr::Conditional {
            test,
            consequent,
            alternate,
        } => {
            if evaluate(test, ctx)?.is_truthy() {
                evaluate(consequent, ctx)
            } else {
                evaluate(alternate, ctx)
            }
        }
        Expr::Filter { input, call } => {
            let input = evaluate(input, ctx)?;
            let args = call
                .args
                .iter()
                .map(|arg| evaluate(arg, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            (call.func)(&input, &args)
        }
    }
}

fn member(object: &Value, property: &str) -> Value {
    match object {
        Value::Object(map) => map.get(property).cloned().unwrap_or(Value::Undefined),
        Value::Array(items) if property == "length" => Value::Number(items.len() as f64),
        Value::String(s) if property == "length" => Value::Number(s.chars().count() as f64),
        Value::Trusted(_, inner) => member(inner, property),
        _ => Value::Undefined,
    }
}

fn index_value(object: &Value, index: &Value) -> Value {
    let position = match index {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as usize),
        _ => None,
    };

    match (object, position) {
        (Value::Array(items), Some(i)) => items.get(i).cloned().unwrap_or(Value::Undefined),
        (Value::String(s), Some(i)) => s
            .chars()
            .nth(i)
            .map(|c| Value::String(c.to_string()))
            .unwrap_or(Value::Undefined),
        _ => member(object, &index.to_display_string()),
    }
}

fn unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Not => Value::Bool(!operand.is_truthy()),
        UnaryOp::Neg => Value::Number(-operand.to_number()),
        UnaryOp::Plus => Value::Number(operand.to_number()),
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => {
            let l = if left.is_undefined() { 0.0 } else { left.to_number() };
            let r = if right.is_undefined() { 0.0 } else { right.to_number() };
            Value::Number(l - r)
        }
        BinaryOp::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOp::Rem => Value::Number(left.to_number() % right.to_number()),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::LtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::GtEq => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::Eq => Value::Bool(left.loose_eq(right)),
        BinaryOp::NotEq => Value::Bool(!left.loose_eq(right)),
        BinaryOp::StrictEq => Value::Bool(left.strict_eq(right)),
        BinaryOp::StrictNotEq => Value::Bool(!left.strict_eq(right)),
        // Short-circuiting operators are handled before operands are evaluated
        BinaryOp::And | BinaryOp::Or => Value::Undefined,
    }
}

/// `+` with undefined operands dropped, string concatenation when either side is textual
fn add(left: &Value, right: &Value) -> Value {
    match (left.is_undefined(), right.is_undefined()) {
        (true, true) => return Value::Undefined,
        (false, true) => return left.clone(),
        (true, false) => return right.clone(),
        (false, false) => {}
    }

    let textual = |v: &Value| {
        matches!(
            v,
            Value::String(_) | Value::Array(_) | Value::Object(_) | Value::Trusted(_, _)
        )
    };
    if textual(left) || textual(right) {
        let mut out = left.to_display_string();
        out.push_str(&right.to_display_string());
        Value::String(out)
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => left.to_number().partial_cmp(&right.to_number()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::filters::FilterRegistry;
    use crate::expr::parser::ExprParser;

    fn eval_in(source: &str, ctx: &Value) -> Value {
        let filters = FilterRegistry::with_builtins();
        let expr = ExprParser::new(source, &filters).unwrap().parse().unwrap();
        evaluate(&expr, ctx).unwrap()
    }

    fn eval(source: &str) -> Value {
        eval_in(source, &Value::Undefined)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1+1"), Value::Number(2.0));
        assert_eq!(eval("2 + 3 * 4"), Value::Number(14.0));
        assert_eq!(eval("(2 + 3) * 4"), Value::Number(20.0));
        assert_eq!(eval("7 % 4"), Value::Number(3.0));
        assert_eq!(eval("-3 + +'2'"), Value::Number(-1.0));
        assert_eq!(eval("10 - 4 - 3"), Value::Number(3.0));
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(eval("'a' + 1"), Value::from("a1"));
        assert_eq!(eval("1 + 2 + 'x'"), Value::from("3x"));
    }

    #[test]
    fn test_undefined_operands_are_forgiving() {
        let ctx = Value::object([("a", 5)]);
        assert_eq!(eval_in("a + missing", &ctx), Value::Number(5.0));
        assert_eq!(eval_in("missing + a", &ctx), Value::Number(5.0));
        assert_eq!(eval_in("missing + other", &ctx), Value::Undefined);
        assert_eq!(eval_in("a - missing", &ctx), Value::Number(5.0));
    }

    #[test]
    fn test_safe_navigation() {
        let ctx = Value::object([("user", Value::object([("name", "Ann")]))]);
        assert_eq!(eval_in("user.name", &ctx), Value::from("Ann"));
        assert_eq!(eval_in("user.address.street", &ctx), Value::Undefined);
        assert_eq!(eval_in("nobody.name.first", &ctx), Value::Undefined);
    }

    #[test]
    fn test_index_and_length() {
        let ctx = Value::object([
            ("items", Value::from(vec!["a", "b"])),
            ("map", Value::object([("k", 1)])),
        ]);
        assert_eq!(eval_in("items[1]", &ctx), Value::from("b"));
        assert_eq!(eval_in("items[5]", &ctx), Value::Undefined);
        assert_eq!(eval_in("items.length", &ctx), Value::Number(2.0));
        assert_eq!(eval_in("map['k']", &ctx), Value::Number(1.0));
        assert_eq!(eval_in("'héllo'.length", &ctx), Value::Number(5.0));
        assert_eq!(eval_in("'abc'[1]", &ctx), Value::from("b"));
    }

    #[test]
    fn test_logical_and_conditional() {
        assert_eq!(eval("0 || 'fallback'"), Value::from("fallback"));
        assert_eq!(eval("1 && 'then'"), Value::from("then"));
        assert_eq!(eval("'' && 'then'"), Value::from(""));
        assert_eq!(eval("!0"), Value::Bool(true));
        assert_eq!(eval("1 > 2 ? 'yes' : 'no'"), Value::from("no"));
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("'a' < 'b'"), Value::Bool(true));
        assert_eq!(eval("2 >= 2"), Value::Bool(true));
        assert_eq!(eval("1 == '1'"), Value::Bool(true));
        assert_eq!(eval("1 === '1'"), Value::Bool(false));
        assert_eq!(eval("null == undefined"), Value::Bool(true));
        assert_eq!(eval("null !== undefined"), Value::Bool(true));
        assert_eq!(eval("undefined < 1"), Value::Bool(false));
    }

    #[test]
    fn test_literals_and_filters() {
        assert_eq!(
            eval("{a: 1, 'b': [true]}"),
            Value::object([
                ("a", Value::Number(1.0)),
                ("b", Value::Array(vec![Value::Bool(true)])),
            ])
        );
        assert_eq!(eval("'abc' | uppercase"), Value::from("ABC"));
        assert_eq!(eval("[1,2,3] | limitTo:2"), Value::from(vec![1, 2]));
    }

    #[test]
    fn test_filter_error_propagates() {
        let mut filters = FilterRegistry::new();
        filters.register("boom", |_, _| Err(EvalError::filter("boom", "exploded")));
        let expr = ExprParser::new("1 | boom", &filters).unwrap().parse().unwrap();
        let err = evaluate(&expr, &Value::Undefined).unwrap_err();
        assert_eq!(err, EvalError::filter("boom", "exploded"));
    }
}
