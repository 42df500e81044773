//! Evaluation contexts
//!
//! A context resolves identifiers for expressions. Contexts that carry a
//! [`ContextId`] get their own memoization slot in every compiled
//! interpolation; contexts without one share a single anonymous slot.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::CurlyError;
use crate::value::Value;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of an evaluation context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u64);

impl ContextId {
    /// Allocate a fresh, process-unique id
    pub fn next() -> Self {
        ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something expressions can be evaluated against
pub trait Context {
    /// Resolve a top-level identifier
    fn lookup(&self, name: &str) -> Option<&Value>;

    /// Identity used as the memoization key, if the context has one
    fn id(&self) -> Option<ContextId> {
        None
    }
}

/// A named-variable context with a stable identity
///
/// Cloning copies the variables under a fresh [`ContextId`], so a clone never
/// shares a memoization slot with its source.
#[derive(Debug)]
pub struct Scope {
    id: ContextId,
    vars: BTreeMap<String, Value>,
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            id: ContextId::next(),
            vars: self.vars.clone(),
        }
    }
}

impl Scope {
    /// Create an empty scope with a fresh identity
    pub fn new() -> Self {
        Self {
            id: ContextId::next(),
            vars: BTreeMap::new(),
        }
    }

    /// Create a scope from the members of an object value
    ///
    /// Non-object values produce an empty scope.
    pub fn from_value(value: Value) -> Self {
        let mut scope = Self::new();
        if let Value::Object(map) = value {
            scope.vars = map;
        }
        scope
    }

    /// Load a scope from a `.json` or `.toml` file holding a top-level object
    pub fn from_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let invalid = |reason: String| CurlyError::ContextInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        let value = if is_toml {
            toml::from_str::<toml::Value>(&content)
                .map(Value::from)
                .map_err(|e| invalid(e.to_string()))?
        } else {
            serde_json::from_str::<serde_json::Value>(&content)
                .map(Value::from)
                .map_err(|e| invalid(e.to_string()))?
        };

        match value {
            Value::Object(_) => Ok(Self::from_value(value)),
            other => Err(invalid(format!(
                "expected an object at the top level, found {}",
                other.type_name()
            ))),
        }
    }

    /// Builder-style variable binding
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Bind or rebind a variable, returning the previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn id(&self) -> ContextId {
        self.id
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Context for Scope {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    fn id(&self) -> Option<ContextId> {
        Some(self.id)
    }
}

/// Plain values act as anonymous contexts; only objects resolve names
impl Context for Value {
    fn lookup(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(name),
            _ => None,
        }
    }
}

impl<C: Context + ?Sized> Context for &C {
    fn lookup(&self, name: &str) -> Option<&Value> {
        (**self).lookup(name)
    }

    fn id(&self) -> Option<ContextId> {
        (**self).id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_ids_are_unique() {
        let a = Scope::new();
        let b = Scope::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_scope_clone_gets_fresh_identity() {
        let original = Scope::new().with("x", 1);
        let copy = original.clone();
        assert_ne!(original.id(), copy.id());
        assert_eq!(copy.get("x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_scope_set_and_lookup() {
        let mut scope = Scope::new().with("name", "curly");
        assert_eq!(scope.lookup("name"), Some(&Value::from("curly")));
        assert_eq!(scope.set("name", 1), Some(Value::from("curly")));
        assert_eq!(scope.remove("name"), Some(Value::Number(1.0)));
        assert!(scope.lookup("name").is_none());
    }

    #[test]
    fn test_value_context_has_no_identity() {
        let value = Value::object([("a", 1)]);
        assert_eq!(value.lookup("a"), Some(&Value::Number(1.0)));
        assert!(Context::id(&value).is_none());
        assert!(Value::Null.lookup("a").is_none());
    }

    #[test]
    fn test_scope_from_value_keeps_members() {
        let scope = Scope::from_value(Value::object([("x", true)]));
        assert_eq!(scope.get("x"), Some(&Value::Bool(true)));
        assert!(Scope::from_value(Value::Null).get("x").is_none());
    }
}
