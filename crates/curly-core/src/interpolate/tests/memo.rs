//! Memoization tests

use std::sync::Arc;
use std::thread;

use super::helpers::compile;
use super::*;
use crate::{Context, Scope, Value};

#[test]
fn test_unchanged_values_return_same_result() {
    let compiled = compile("Hello {{name}}");
    let scope = Scope::new().with("name", "Ann");

    let first = compiled.evaluate(&scope).unwrap().unwrap();
    let second = compiled.evaluate(&scope).unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        compiled.stats(),
        CacheStats {
            hits: 1,
            recomputes: 1
        }
    );
}

#[test]
fn test_changed_value_recomputes() {
    let compiled = compile("Hello {{name}}");
    let mut scope = Scope::new().with("name", "Ann");

    let first = compiled.evaluate(&scope).unwrap().unwrap();
    scope.set("name", "Bob");
    let second = compiled.evaluate(&scope).unwrap().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(&*second, "Hello Bob");
    assert_eq!(compiled.stats().recomputes, 2);
}

#[test]
fn test_equal_stringified_values_hit() {
    let compiled = compile("{{n}}");
    let mut scope = Scope::new().with("n", 1);

    let first = compiled.evaluate(&scope).unwrap().unwrap();
    scope.set("n", "1");
    let second = compiled.evaluate(&scope).unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_contexts_have_independent_entries() {
    let compiled = compile("{{v}}");
    let a = Scope::new().with("v", "a");
    let b = Scope::new().with("v", "b");

    let from_a = compiled.evaluate(&a).unwrap().unwrap();
    let from_b = compiled.evaluate(&b).unwrap().unwrap();
    assert_eq!(&*from_a, "a");
    assert_eq!(&*from_b, "b");

    let again = compiled.evaluate(&a).unwrap().unwrap();
    assert!(Arc::ptr_eq(&from_a, &again));

    let mut keys = compiled.cached_contexts();
    keys.sort_by_key(|key| match key {
        CacheKey::Context(id) => id.get(),
        CacheKey::Anonymous => 0,
    });
    assert_eq!(
        keys,
        vec![CacheKey::Context(a.id()), CacheKey::Context(b.id())]
    );
}

#[test]
fn test_anonymous_contexts_share_one_entry() {
    let compiled = compile("{{v}}");
    let first = Value::object([("v", 1)]);
    let second = Value::object([("v", 1)]);
    assert_eq!(Context::id(&first), None);

    let a = compiled.evaluate(&first).unwrap().unwrap();
    let b = compiled.evaluate(&second).unwrap().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(compiled.cached_contexts(), vec![CacheKey::Anonymous]);
}

#[test]
fn test_retire_drops_entry() {
    let compiled = compile("{{v}}");
    let scope = Scope::new().with("v", 1);

    let first = compiled.evaluate(&scope).unwrap().unwrap();
    assert!(compiled.retire(scope.id()));
    assert!(!compiled.retire(scope.id()));
    assert!(compiled.cached_contexts().is_empty());

    let second = compiled.evaluate(&scope).unwrap().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);
}

#[test]
fn test_clear_cache() {
    let compiled = compile("{{v}}");
    compiled.evaluate(&Scope::new()).unwrap();
    compiled.evaluate(&Value::Undefined).unwrap();
    assert_eq!(compiled.cached_contexts().len(), 2);

    compiled.clear_cache();
    assert!(compiled.cached_contexts().is_empty());
}

#[test]
fn test_concurrent_evaluation() {
    let compiled = Arc::new(compile("{{name}}#{{n}}"));

    thread::scope(|s| {
        for worker in 0..4 {
            let compiled = Arc::clone(&compiled);
            s.spawn(move || {
                let scope = Scope::new().with("name", "w").with("n", worker);
                for _ in 0..50 {
                    let rendered = compiled.evaluate(&scope).unwrap().unwrap();
                    assert_eq!(&*rendered, format!("w#{}", worker));
                }
            });
        }
    });

    assert_eq!(compiled.cached_contexts().len(), 4);
    assert_eq!(compiled.stats().recomputes, 4);
    assert_eq!(compiled.stats().hits, 4 * 49);
}

#[test]
fn test_cloned_scope_has_its_own_slot() {
    let compiled = compile("{{name}}");
    let original = Scope::new().with("name", "Ann");
    let mut copy = original.clone();
    copy.set("name", "Bob");

    assert_eq!(&*compiled.evaluate(&original).unwrap().unwrap(), "Ann");
    assert_eq!(&*compiled.evaluate(&copy).unwrap().unwrap(), "Bob");
    assert_eq!(compiled.cached_contexts().len(), 2);

    assert!(compiled.retire(copy.id()));
    assert_eq!(
        compiled.cached_contexts(),
        vec![CacheKey::for_context(&original)]
    );
}
