//! Interpolation compiler
//!
//! [`Interpolator`] scans a template for `{{expression}}` markers, parses the
//! embedded expressions and produces an [`Interpolation`] that renders the
//! template against contexts.
//!
//! ```
//! use curly_core::{CompileOptions, Interpolator, Scope};
//!
//! let interpolator = Interpolator::new();
//! let compiled = interpolator
//!     .compile("Hello {{name}}!", CompileOptions::default())
//!     .unwrap()
//!     .unwrap();
//!
//! let scope = Scope::new().with("name", "world");
//! assert_eq!(compiled.evaluate(&scope).unwrap().as_deref(), Some("Hello world!"));
//! ```
//!
//! Escaped markers (`{{{{` and `}}}}` by default) render as literal markers:
//!
//! ```
//! use curly_core::{render, Value};
//!
//! assert_eq!(render("{{{{x}}}}", &Value::Undefined).unwrap(), "{{x}}");
//! ```

mod cache;
mod compiled;
pub mod error;
mod markers;
mod scanner;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::expr::{ExpressionParser, FilterRegistry, Parser, Program};
use crate::report::{CollectingReporter, ErrorReporter, TracingReporter};
use crate::trust::{StrictContextualEscaping, TrustService};
use crate::value::SinkCategory;

pub use cache::{CacheKey, CacheStats};
pub use compiled::Interpolation;
pub use error::InterpolateError;
pub use markers::Markers;

/// Per-compilation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Return `None` instead of an interpolation when the text has no markers
    pub must_have_expression: bool,
    /// Sink the rendered value is bound to; enables strict checks
    pub trusted_context: Option<SinkCategory>,
    /// Render nothing unless every expression is defined
    pub all_or_nothing: bool,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must_have_expression(mut self, value: bool) -> Self {
        self.must_have_expression = value;
        self
    }

    pub fn trusted_context(mut self, sink: SinkCategory) -> Self {
        self.trusted_context = Some(sink);
        self
    }

    pub fn all_or_nothing(mut self, value: bool) -> Self {
        self.all_or_nothing = value;
        self
    }
}

/// Immutable interpolation compiler
#[derive(Clone)]
pub struct Interpolator {
    markers: Markers,
    parser: Arc<dyn ExpressionParser>,
    trust: Arc<dyn TrustService>,
    reporter: Arc<dyn ErrorReporter>,
}

impl Interpolator {
    /// Default markers, stock parser, strict trust service, tracing reporter
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> InterpolatorBuilder {
        InterpolatorBuilder::default()
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn start_symbol(&self) -> &str {
        self.markers.start()
    }

    pub fn end_symbol(&self) -> &str {
        self.markers.end()
    }

    /// Compile a template
    ///
    /// Returns `Ok(None)` only when `must_have_expression` is set and the text
    /// contains no marker pair.
    ///
    /// # Errors
    ///
    /// - [`InterpolateError::Parse`] if an embedded expression is malformed
    /// - [`InterpolateError::DisallowedConcatenation`] if a trusted context is
    ///   requested and the text mixes literal text or several expressions
    pub fn compile(
        &self,
        text: &str,
        options: CompileOptions,
    ) -> Result<Option<Interpolation>, InterpolateError> {
        let scan = scanner::scan(text, &self.markers);
        let has_interpolation = scan.has_interpolation();

        let programs = scan
            .expressions
            .iter()
            .map(|source| self.parser.parse(source))
            .collect::<Result<Vec<Arc<dyn Program>>, _>>()?;

        if options.trusted_context.is_some()
            && has_interpolation
            && (scan.has_text || scan.expressions.len() > 1)
        {
            return Err(InterpolateError::DisallowedConcatenation {
                text: text.to_string(),
            });
        }

        if options.must_have_expression && !has_interpolation {
            return Ok(None);
        }

        tracing::debug!(
            text,
            expressions = programs.len(),
            trusted_context = ?options.trusted_context,
            "compiled interpolation"
        );

        Ok(Some(Interpolation::new(
            text.to_string(),
            scan.separators,
            scan.expressions,
            programs,
            options,
            Arc::clone(&self.trust),
            Arc::clone(&self.reporter),
        )))
    }

    /// Compile and evaluate once
    ///
    /// Failures that would normally go to the reporter are returned as the
    /// first reported error instead.
    pub fn render(&self, text: &str, ctx: &dyn Context) -> Result<String, InterpolateError> {
        let Some(compiled) = self.compile(text, CompileOptions::default())? else {
            return Ok(String::new());
        };

        let reporter = CollectingReporter::new();
        let rendered = compiled.evaluate_with(ctx, &reporter)?;
        if let Some(error) = reporter.take().into_iter().next() {
            return Err(error);
        }
        Ok(rendered.map(|s| s.to_string()).unwrap_or_default())
    }
}

impl Default for Interpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpolator")
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Interpolator`]
#[derive(Default)]
pub struct InterpolatorBuilder {
    markers: Markers,
    parser: Option<Arc<dyn ExpressionParser>>,
    trust: Option<Arc<dyn TrustService>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl InterpolatorBuilder {
    pub fn markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    /// Replace the expression parser
    pub fn parser(mut self, parser: Arc<dyn ExpressionParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Use the stock parser with a custom filter set
    pub fn filters(self, filters: FilterRegistry) -> Self {
        self.parser(Arc::new(Parser::with_filters(filters)))
    }

    pub fn trust(mut self, trust: Arc<dyn TrustService>) -> Self {
        self.trust = Some(trust);
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn build(self) -> Interpolator {
        Interpolator {
            markers: self.markers,
            parser: self.parser.unwrap_or_else(|| Arc::new(Parser::new())),
            trust: self
                .trust
                .unwrap_or_else(|| Arc::new(StrictContextualEscaping::new())),
            reporter: self.reporter.unwrap_or_else(|| Arc::new(TracingReporter)),
        }
    }
}

/// Render a template once with the default interpolator
///
/// # Errors
///
/// Returns the compile error, the trust error, or the first evaluation error.
pub fn render(text: &str, ctx: &dyn Context) -> Result<String, InterpolateError> {
    Interpolator::new().render(text, ctx)
}
