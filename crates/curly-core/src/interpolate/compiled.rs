//! Compiled interpolation artifact

use std::fmt;
use std::sync::Arc;

use super::cache::{CacheEntry, CacheKey, CacheStats, EvaluationCache};
use super::error::InterpolateError;
use super::CompileOptions;
use crate::context::{Context, ContextId};
use crate::expr::{EvalError, Program};
use crate::report::ErrorReporter;
use crate::trust::{TrustError, TrustService};

/// A compiled template, evaluable against any number of contexts
///
/// Each context with an identity gets its own memo of the last stringified
/// values; when none of them changed, the previous result is returned as the
/// very same `Arc<str>`. Contexts without an identity share one slot.
pub struct Interpolation {
    text: String,
    separators: Vec<String>,
    expressions: Vec<String>,
    programs: Vec<Arc<dyn Program>>,
    options: CompileOptions,
    trust: Arc<dyn TrustService>,
    reporter: Arc<dyn ErrorReporter>,
    cache: EvaluationCache,
}

impl Interpolation {
    pub(crate) fn new(
        text: String,
        separators: Vec<String>,
        expressions: Vec<String>,
        programs: Vec<Arc<dyn Program>>,
        options: CompileOptions,
        trust: Arc<dyn TrustService>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            text,
            separators,
            expressions,
            programs,
            options,
            trust,
            reporter,
            cache: EvaluationCache::default(),
        }
    }

    /// Render against a context
    ///
    /// Returns `Ok(None)` when nothing has been rendered yet and an expression
    /// failed, or when all-or-nothing mode met an undefined value.
    ///
    /// # Errors
    ///
    /// Returns a [`TrustError`] when a value cannot be certified for the
    /// trusted context. Expression failures are sent to the reporter instead.
    pub fn evaluate(&self, ctx: &dyn Context) -> Result<Option<Arc<str>>, TrustError> {
        self.evaluate_with(ctx, self.reporter.as_ref())
    }

    pub(crate) fn evaluate_with(
        &self,
        ctx: &dyn Context,
        reporter: &dyn ErrorReporter,
    ) -> Result<Option<Arc<str>>, TrustError> {
        let key = CacheKey::for_context(ctx);
        let cached = self.cache.snapshot(key);
        let mut inputs_changed = cached.is_none();
        let mut values = Vec::with_capacity(self.programs.len());

        for (i, program) in self.programs.iter().enumerate() {
            let raw = match program.evaluate(ctx) {
                Ok(value) => value,
                Err(err) => {
                    self.report_failure(reporter, &err);
                    return Ok(cached.map(|entry| entry.result));
                }
            };

            let value = match self.options.trusted_context {
                Some(sink) => self.trust.get_trusted(sink, raw)?,
                None => self.trust.unwrap_if_trusted(raw),
            };

            if self.options.all_or_nothing && value.is_undefined() {
                return Ok(None);
            }

            let rendered = value.stringify();
            let previous = cached.as_ref().and_then(|entry| entry.values.get(i));
            if previous != Some(&rendered) {
                inputs_changed = true;
            }
            values.push(rendered);
        }

        if let Some(entry) = cached.filter(|_| !inputs_changed) {
            self.cache.record_hit();
            tracing::trace!(text = %self.text, key = ?key, "interpolation cache hit");
            return Ok(Some(entry.result));
        }

        let result: Arc<str> = Arc::from(self.concatenate(&values));
        self.cache.store(
            key,
            CacheEntry {
                values: Arc::new(values),
                result: Arc::clone(&result),
            },
        );
        Ok(Some(result))
    }

    fn concatenate(&self, values: &[String]) -> String {
        let mut out = String::new();
        for (i, separator) in self.separators.iter().enumerate() {
            out.push_str(separator);
            if let Some(value) = values.get(i) {
                out.push_str(value);
            }
        }
        out
    }

    fn report_failure(&self, reporter: &dyn ErrorReporter, err: &EvalError) {
        let error = InterpolateError::Evaluation {
            text: self.text.clone(),
            cause: err.to_string(),
        };
        reporter.report(&error);
    }

    /// The template text this interpolation was compiled from
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Literal pieces between expressions (one more than expressions)
    pub fn separators(&self) -> &[String] {
        &self.separators
    }

    /// Expression sources in template order
    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Whether every embedded expression is independent of the context
    pub fn is_constant(&self) -> bool {
        self.programs.iter().all(|program| program.is_constant())
    }

    /// Drop the memo entry of a context that is going away
    ///
    /// Returns `true` if an entry existed.
    pub fn retire(&self, id: ContextId) -> bool {
        let removed = self.cache.remove(CacheKey::Context(id));
        if removed {
            tracing::debug!(text = %self.text, context = %id, "retired interpolation cache entry");
        }
        removed
    }

    /// Drop every memo entry
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Keys currently holding a memo entry
    pub fn cached_contexts(&self) -> Vec<CacheKey> {
        self.cache.keys()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl fmt::Debug for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpolation")
            .field("text", &self.text)
            .field("separators", &self.separators)
            .field("expressions", &self.expressions)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
