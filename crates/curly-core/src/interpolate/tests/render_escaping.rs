//! Escaped marker rendering tests

use super::helpers::{eval, simple_scope};
use super::*;
use crate::{Scope, Value};

#[test]
fn test_escaped_markers_render_literally() {
    assert_eq!(eval("{{{{x}}}}", &Value::Undefined).as_deref(), Some("{{x}}"));
}

#[test]
fn test_escaped_markers_next_to_expression() {
    let scope = Scope::new().with("a", "A").with("b", 1);
    assert_eq!(eval("{{{{a}}}} {{b}}", &scope).as_deref(), Some("{{a}} 1"));
    assert_eq!(eval("{{{{a}}}}{{b}}", &scope).as_deref(), Some("{{a}}1"));
    assert_eq!(eval("{{a}}{{{{b}}}}", &scope).as_deref(), Some("A{{b}}"));
}

#[test]
fn test_unterminated_markers_are_literal() {
    let scope = simple_scope();
    assert_eq!(eval("a{{b", &scope).as_deref(), Some("a{{b"));
    assert_eq!(eval("}}{{", &scope).as_deref(), Some("}}{{"));
    assert_eq!(eval("{{name}} {{", &scope).as_deref(), Some("Misko {{"));
}

#[test]
fn test_unclosed_escape_start() {
    let scope = Scope::new().with("a", "A");
    assert_eq!(eval("{{{{a}}", &scope).as_deref(), Some("{{A"));
}

#[test]
fn test_custom_escaped_markers() {
    let markers = Markers::new("[[", "]]")
        .unwrap()
        .with_escaped("\\[[", "\\]]")
        .unwrap();
    let interpolator = Interpolator::builder().markers(markers).build();
    let scope = Scope::new().with("y", "Y");
    assert_eq!(
        interpolator.render("\\[[x\\]] [[y]]", &scope).unwrap(),
        "[[x]] Y"
    );
}
