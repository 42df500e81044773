//! All-or-nothing mode tests

use std::sync::Arc;

use super::helpers::compile_with;
use super::*;
use crate::{Scope, Value};

fn all_or_nothing() -> CompileOptions {
    CompileOptions::new().all_or_nothing(true)
}

#[test]
fn test_undefined_value_yields_nothing() {
    let compiled = compile_with("{{a}} {{b}}", all_or_nothing());
    let scope = Scope::new().with("a", 1);
    assert_eq!(compiled.evaluate(&scope).unwrap(), None);
}

#[test]
fn test_all_defined_renders() {
    let compiled = compile_with("{{a}} {{b}}", all_or_nothing());
    let scope = Scope::new().with("a", 1).with("b", 2);
    assert_eq!(compiled.evaluate(&scope).unwrap().as_deref(), Some("1 2"));
}

#[test]
fn test_null_counts_as_defined() {
    let compiled = compile_with("{{a}} {{b}}", all_or_nothing());
    let scope = Scope::new().with("a", Value::Null).with("b", 2);
    assert_eq!(compiled.evaluate(&scope).unwrap().as_deref(), Some(" 2"));
}

#[test]
fn test_without_flag_undefined_renders_empty() {
    let compiled = compile_with("{{a}} {{b}}", CompileOptions::default());
    let scope = Scope::new().with("a", 1);
    assert_eq!(compiled.evaluate(&scope).unwrap().as_deref(), Some("1 "));
}

#[test]
fn test_undefined_does_not_touch_cache() {
    let compiled = compile_with("{{a}}-{{b}}", all_or_nothing());
    let mut scope = Scope::new().with("a", 1).with("b", 2);

    let first = compiled.evaluate(&scope).unwrap().unwrap();

    scope.remove("b");
    assert_eq!(compiled.evaluate(&scope).unwrap(), None);

    scope.set("b", 2);
    let again = compiled.evaluate(&scope).unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(compiled.stats().recomputes, 1);
}
