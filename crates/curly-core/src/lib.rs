//! Interpolation compiler for `{{expression}}` templates
//!
//! ```
//! use curly_core::{render, Scope};
//!
//! let scope = Scope::new().with("who", "world");
//! assert_eq!(render("Hello {{who | uppercase}}", &scope).unwrap(), "Hello WORLD");
//! ```

// Core modules
pub mod config;
pub mod context;
pub mod error;
pub mod expr;
pub mod interpolate;
pub mod report;
pub mod trust;
pub mod value;

// Re-export commonly used types
pub use config::Config;
pub use context::{Context, ContextId, Scope};
pub use error::{CurlyError, Result};
pub use interpolate::{
    render, CacheKey, CacheStats, CompileOptions, InterpolateError, Interpolation, Interpolator,
    InterpolatorBuilder, Markers,
};
pub use report::{CollectingReporter, ErrorReporter, TracingReporter};
pub use trust::{StrictContextualEscaping, TrustError, TrustService};
pub use value::{SinkCategory, Value};
