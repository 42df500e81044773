//! Filters applied with `expr | name:arg`
//!
//! Filters are resolved when an expression is parsed, so an unknown filter
//! name fails compilation instead of every evaluation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::EvalError;
use crate::value::Value;

/// A filter implementation: `(input, args) -> output`
pub type FilterFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, EvalError> + Send + Sync>;

/// Named filters available to the expression parser
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterFn>,
}

impl FilterRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `uppercase`, `lowercase`, `json`, `number` and `limitTo`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("uppercase", |input, _| Ok(uppercase(input)));
        registry.register("lowercase", |input, _| Ok(lowercase(input)));
        registry.register("json", |input, _| Ok(Value::String(input.to_json_pretty())));
        registry.register("number", number);
        registry.register("limitTo", limit_to);
        registry
    }

    /// Register or replace a filter
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }

    pub fn get(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered filter names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

fn uppercase(input: &Value) -> Value {
    match input {
        Value::String(s) => Value::String(s.to_uppercase()),
        other => other.clone(),
    }
}

fn lowercase(input: &Value) -> Value {
    match input {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other.clone(),
    }
}

/// Largest fraction size accepted by the `number` filter
const MAX_FRACTION_SIZE: f64 = 20.0;

/// Group digits and round: `1234.5678 | number` → `1,234.568`
fn number(input: &Value, args: &[Value]) -> Result<Value, EvalError> {
    let fraction_size = match args.first() {
        None | Some(Value::Undefined) => None,
        Some(arg) => {
            let size = arg.to_number();
            if size.is_nan() || size.fract() != 0.0 {
                return Err(EvalError::filter(
                    "number",
                    format!("fraction size must be an integer, got {}", arg.to_display_string()),
                ));
            }
            if size < 0.0 {
                return Err(EvalError::filter(
                    "number",
                    format!("fraction size must be non-negative, got {}", size),
                ));
            }
            if size > MAX_FRACTION_SIZE {
                return Err(EvalError::filter(
                    "number",
                    format!(
                        "fraction size must be at most {}, got {}",
                        MAX_FRACTION_SIZE, size
                    ),
                ));
            }
            Some(size as usize)
        }
    };

    let n = match input {
        Value::Number(n) => *n,
        Value::String(_) | Value::Bool(_) => input.to_number(),
        _ => return Ok(Value::String(String::new())),
    };
    if !n.is_finite() {
        return Ok(Value::String(String::new()));
    }

    Ok(Value::String(format_grouped(n, fraction_size)))
}

fn format_grouped(n: f64, fraction_size: Option<usize>) -> String {
    let digits = fraction_size.unwrap_or(3);
    let factor = 10f64.powi(digits as i32);
    let mut rounded = (n.abs() * factor).round() / factor;
    if !rounded.is_finite() {
        rounded = n.abs();
    }
    let mut formatted = format!("{:.*}", digits, rounded);

    // Without an explicit size, trailing zeros are dropped (up to 3 decimals)
    if fraction_size.is_none() && formatted.contains('.') {
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.').len();
        formatted.truncate(trimmed);
    }

    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), Some(frac_part.to_string())),
        None => (formatted.clone(), None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if n < 0.0 && rounded != 0.0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Take the first (or, for a negative limit, last) `limit` items of an array or string
fn limit_to(input: &Value, args: &[Value]) -> Result<Value, EvalError> {
    let limit = args.first().map(Value::to_number).unwrap_or(f64::NAN);
    if limit.is_nan() {
        return Ok(input.clone());
    }
    let limit = limit.trunc();

    let take = |len: usize| -> (usize, usize) {
        let n = (limit.abs() as usize).min(len);
        if limit >= 0.0 {
            (0, n)
        } else {
            (len - n, len)
        }
    };

    match input {
        Value::Array(items) => {
            let (from, to) = take(items.len());
            Ok(Value::Array(items[from..to].to_vec()))
        }
        Value::String(_) | Value::Number(_) => {
            let text = input.to_display_string();
            let chars: Vec<char> = text.chars().collect();
            let (from, to) = take(chars.len());
            Ok(Value::String(chars[from..to].iter().collect()))
        }
        other => Ok(other.clone()),
    }
}
