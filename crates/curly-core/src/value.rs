//! Runtime values produced by expressions
//!
//! `Value` is the currency between the expression language, the trust service
//! and the interpolation evaluator. Trusted values are an explicit variant
//! rather than a wrapper object, so unwrapping is a match on the tag.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sink categories a trusted value can be certified for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SinkCategory {
    Html,
    Css,
    Url,
    ResourceUrl,
    Js,
}

impl SinkCategory {
    /// Name used in error messages and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkCategory::Html => "html",
            SinkCategory::Css => "css",
            SinkCategory::Url => "url",
            SinkCategory::ResourceUrl => "resource-url",
            SinkCategory::Js => "js",
        }
    }

    /// Whether a value certified for `self` may be used where `required` is expected
    ///
    /// A resource URL is a stricter certification than a URL, so it satisfies both.
    pub fn satisfies(&self, required: SinkCategory) -> bool {
        *self == required || (*self == SinkCategory::ResourceUrl && required == SinkCategory::Url)
    }
}

impl fmt::Display for SinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SinkCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(SinkCategory::Html),
            "css" => Ok(SinkCategory::Css),
            "url" => Ok(SinkCategory::Url),
            "resource-url" | "resource_url" | "resourceurl" => Ok(SinkCategory::ResourceUrl),
            "js" => Ok(SinkCategory::Js),
            other => Err(format!("unknown sink category '{}'", other)),
        }
    }
}

/// A dynamically typed expression value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    /// A value certified safe for a specific sink
    Trusted(SinkCategory, Box<Value>),
}

impl Value {
    /// Wrap a value as trusted for `sink`
    pub fn trusted(sink: SinkCategory, value: impl Into<Value>) -> Self {
        Value::Trusted(sink, Box::new(value.into()))
    }

    /// Build an object value from key/value pairs
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// `true` for `Undefined` and `Null`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// JavaScript-style truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
            Value::Trusted(_, inner) => inner.is_truthy(),
        }
    }

    /// Name of the value's type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Trusted(_, _) => "trusted",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric coercion following JavaScript's `Number(x)`
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            Value::Array(items) => match items.as_slice() {
                [] => 0.0,
                [single] => single.to_number(),
                _ => f64::NAN,
            },
            Value::Object(_) => f64::NAN,
            Value::Trusted(_, inner) => inner.to_number(),
        }
    }

    /// String coercion following JavaScript's `String(x)`
    ///
    /// Used by the `+` operator and string filters. Interpolation output uses
    /// [`Value::stringify`] instead.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_display_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Trusted(_, inner) => inner.to_display_string(),
        }
    }

    /// Stringify a value for interpolation output
    ///
    /// `Undefined` and `Null` become the empty string, strings are kept,
    /// numbers use their textual form and everything else is serialized as
    /// compact JSON.
    pub fn stringify(&self) -> String {
        match self {
            Value::Undefined | Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Trusted(_, inner) => inner.stringify(),
            other => other.to_json_string(),
        }
    }

    /// Serialize to compact JSON
    ///
    /// Object keys starting with `$$` and `Undefined` members are omitted;
    /// `Undefined` array items and non-finite numbers serialize as `null`.
    pub fn to_json_string(&self) -> String {
        let json = self.to_json().unwrap_or(serde_json::Value::Null);
        json.to_string()
    }

    /// Pretty-printed JSON, as produced by the `json` filter
    pub fn to_json_pretty(&self) -> String {
        let json = self.to_json().unwrap_or(serde_json::Value::Null);
        serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
    }

    /// Convert to a `serde_json::Value`, `None` for `Undefined`
    pub fn to_json(&self) -> Option<serde_json::Value> {
        match self {
            Value::Undefined => None,
            Value::Null => Some(serde_json::Value::Null),
            Value::Bool(b) => Some(serde_json::Value::Bool(*b)),
            Value::Number(n) => Some(number_to_json(*n)),
            Value::String(s) => Some(serde_json::Value::String(s.clone())),
            Value::Array(items) => Some(serde_json::Value::Array(
                items
                    .iter()
                    .map(|item| item.to_json().unwrap_or(serde_json::Value::Null))
                    .collect(),
            )),
            Value::Object(map) => {
                let mut out = serde_json::Map::new();
                for (key, value) in map {
                    if key.starts_with("$$") {
                        continue;
                    }
                    if let Some(json) = value.to_json() {
                        out.insert(key.clone(), json);
                    }
                }
                Some(serde_json::Value::Object(out))
            }
            Value::Trusted(_, inner) => inner.to_json(),
        }
    }

    /// Strict equality (`===`)
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Trusted(_, a), b) | (b, Value::Trusted(_, a)) => a.strict_eq(b),
            (a, b) => a == b,
        }
    }

    /// Loose equality (`==`) for primitive values
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => self == other,
            (a, b) => a.to_number() == b.to_number(),
        }
    }
}

/// Format a number the way JavaScript's `String(n)` does for common values
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else {
        format!("{}", n)
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        serde_json::Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i as f64),
            toml::Value::Float(f) => Value::Number(f),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            toml::Value::Table(table) => Value::Object(
                table
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Undefined)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stringify_nullish_is_empty() {
        assert_eq!(Value::Undefined.stringify(), "");
        assert_eq!(Value::Null.stringify(), "");
    }

    #[test]
    fn test_stringify_numbers() {
        assert_eq!(Value::Number(2.0).stringify(), "2");
        assert_eq!(Value::Number(2.5).stringify(), "2.5");
        assert_eq!(Value::Number(-0.0).stringify(), "0");
        assert_eq!(Value::Number(f64::NAN).stringify(), "NaN");
        assert_eq!(Value::Number(f64::INFINITY).stringify(), "Infinity");
    }

    #[test]
    fn test_stringify_structures_as_json() {
        let value = Value::object([
            ("a", Value::Number(1.0)),
            ("$$hashKey", Value::from("x")),
            ("gone", Value::Undefined),
        ]);
        assert_eq!(value.stringify(), r#"{"a":1}"#);

        let list = Value::Array(vec![Value::Bool(true), Value::Undefined, Value::from("s")]);
        assert_eq!(list.stringify(), r#"[true,null,"s"]"#);
        assert_eq!(Value::Bool(false).stringify(), "false");
    }

    #[test]
    fn test_to_number_coercion() {
        assert_eq!(Value::from(" 42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert!(Value::from("abc").to_number().is_nan());
        assert_eq!(Value::Null.to_number(), 0.0);
        assert!(Value::Undefined.to_number().is_nan());
    }

    #[test]
    fn test_loose_and_strict_equality() {
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(!Value::Null.strict_eq(&Value::Undefined));
        assert!(Value::from("1").loose_eq(&Value::Number(1.0)));
        assert!(!Value::from("1").strict_eq(&Value::Number(1.0)));
    }

    #[test]
    fn test_resource_url_satisfies_url() {
        assert!(SinkCategory::ResourceUrl.satisfies(SinkCategory::Url));
        assert!(!SinkCategory::Url.satisfies(SinkCategory::ResourceUrl));
        assert!(SinkCategory::Html.satisfies(SinkCategory::Html));
    }

    #[test]
    fn test_sink_category_from_str() {
        assert_eq!("resource-url".parse(), Ok(SinkCategory::ResourceUrl));
        assert_eq!("HTML".parse(), Ok(SinkCategory::Html));
        assert!("xml".parse::<SinkCategory>().is_err());
    }

    #[test]
    fn test_from_json_and_toml() {
        let json: Value = serde_json::json!({"n": 1, "list": [true, null]}).into();
        assert_eq!(
            json,
            Value::object([
                ("n", Value::Number(1.0)),
                ("list", Value::Array(vec![Value::Bool(true), Value::Null])),
            ])
        );

        let toml_value: toml::Value = toml::from_str("name = \"x\"\ncount = 3").unwrap();
        let value = Value::from(toml_value);
        assert_eq!(
            value,
            Value::object([("name", Value::from("x")), ("count", Value::Number(3.0))])
        );
    }
}
