//! Trust service for values bound into sensitive sinks
//!
//! An interpolation compiled with a trusted context passes every value
//! through [`TrustService::get_trusted`]; other interpolations only strip the
//! trust tag with [`TrustService::unwrap_if_trusted`].

use thiserror::Error;

use crate::value::{SinkCategory, Value};

/// Raised when a value cannot be certified for a sink
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrustError {
    #[error("UNSAFE: attempting to use an unsafe value of type {value_type} in a safe context ({sink})")]
    Unsafe {
        sink: SinkCategory,
        value_type: &'static str,
    },

    #[error("INSECURL: blocked loading resource from url not allowed by the resource URL whitelist: {url}")]
    InsecureUrl { url: String },
}

/// Certifies values for sinks
pub trait TrustService: Send + Sync {
    /// Return the plain value if `value` may be used in `sink`
    ///
    /// # Errors
    ///
    /// Returns a [`TrustError`] if the value is not certified for the sink.
    fn get_trusted(&self, sink: SinkCategory, value: Value) -> Result<Value, TrustError>;

    /// Strip the trust tag if present, otherwise return the value unchanged
    fn unwrap_if_trusted(&self, value: Value) -> Value {
        match value {
            Value::Trusted(_, inner) => *inner,
            other => other,
        }
    }
}

/// Strict contextual escaping
///
/// - `undefined`, `null` and `""` always pass;
/// - values tagged for the sink (or a resource URL used as a URL) pass unwrapped;
/// - plain strings pass for resource URLs when they start with a whitelisted prefix;
/// - everything else is rejected.
#[derive(Debug, Clone)]
pub struct StrictContextualEscaping {
    enabled: bool,
    resource_url_whitelist: Vec<String>,
}

impl StrictContextualEscaping {
    pub fn new() -> Self {
        Self {
            enabled: true,
            resource_url_whitelist: Vec::new(),
        }
    }

    /// A service that certifies everything (trust tags are still stripped)
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            resource_url_whitelist: Vec::new(),
        }
    }

    pub fn with_resource_url_whitelist<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resource_url_whitelist = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn resource_url_whitelist(&self) -> &[String] {
        &self.resource_url_whitelist
    }

    fn is_resource_url_allowed(&self, url: &str) -> bool {
        self.resource_url_whitelist
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }
}

impl Default for StrictContextualEscaping {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustService for StrictContextualEscaping {
    fn get_trusted(&self, sink: SinkCategory, value: Value) -> Result<Value, TrustError> {
        if !self.enabled {
            return Ok(self.unwrap_if_trusted(value));
        }

        match value {
            Value::Undefined | Value::Null => Ok(value),
            Value::String(s) if s.is_empty() => Ok(Value::String(s)),
            Value::Trusted(held, inner) if held.satisfies(sink) => Ok(*inner),
            Value::String(url) if sink == SinkCategory::ResourceUrl => {
                if self.is_resource_url_allowed(&url) {
                    Ok(Value::String(url))
                } else {
                    Err(TrustError::InsecureUrl { url })
                }
            }
            other => Err(TrustError::Unsafe {
                sink,
                value_type: other.type_name(),
            }),
        }
    }
}
