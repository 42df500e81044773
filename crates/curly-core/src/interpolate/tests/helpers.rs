//! Shared test helpers for interpolation tests

use std::sync::Arc;

use toml::toml;

use crate::expr::{EvalError, FilterRegistry};
use crate::interpolate::{CompileOptions, Interpolation, Interpolator};
use crate::report::CollectingReporter;
use crate::{Context, Scope, Value};

/// Create a scope with basic scalar values
pub(super) fn simple_scope() -> Scope {
    let data = toml! {
        name = "Misko"
        count = 3
        price = 9.5
        enabled = true
    };
    Scope::from_value(Value::from(toml::Value::Table(data)))
}

/// Create a scope with nested tables and arrays
pub(super) fn nested_scope() -> Scope {
    let data = toml! {
        tags = ["a", "b"]

        [user]
        name = "Ann"
    };
    Scope::from_value(Value::from(toml::Value::Table(data)))
}

/// Filters that fail on demand
pub(super) fn failing_filters() -> FilterRegistry {
    let mut filters = FilterRegistry::with_builtins();
    filters.register("explode", |_, _| Err(EvalError::filter("explode", "kaboom")));
    filters.register("positive", |input, _| match input.as_number() {
        Some(n) if n < 0.0 => Err(EvalError::filter("positive", "negative input")),
        _ => Ok(input.clone()),
    });
    filters
}

/// Interpolator reporting into a shared collecting reporter
pub(super) fn collecting() -> (Interpolator, Arc<CollectingReporter>) {
    let reporter = Arc::new(CollectingReporter::new());
    let interpolator = Interpolator::builder()
        .filters(failing_filters())
        .reporter(reporter.clone())
        .build();
    (interpolator, reporter)
}

/// Compile with default options
pub(super) fn compile(text: &str) -> Interpolation {
    compile_with(text, CompileOptions::default())
}

pub(super) fn compile_with(text: &str, options: CompileOptions) -> Interpolation {
    Interpolator::new()
        .compile(text, options)
        .unwrap()
        .expect("interpolation should be produced")
}

/// Compile and evaluate once
pub(super) fn eval(text: &str, ctx: &dyn Context) -> Option<String> {
    compile(text)
        .evaluate(ctx)
        .unwrap()
        .map(|s| s.to_string())
}
