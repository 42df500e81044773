//! Error reporting for failures that do not abort evaluation

use std::sync::{Mutex, MutexGuard};

use crate::interpolate::InterpolateError;

/// Receives evaluation failures
///
/// Evaluating an interpolation never returns expression errors to the caller;
/// they are handed to a reporter exactly once per failing call.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &InterpolateError);
}

/// Logs failures through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &InterpolateError) {
        tracing::error!(error = %error, "interpolation failed");
    }
}

/// Keeps failures in memory for later inspection
#[derive(Debug, Default)]
pub struct CollectingReporter {
    errors: Mutex<Vec<InterpolateError>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<InterpolateError>> {
        self.errors.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the collected errors, oldest first
    pub fn errors(&self) -> Vec<InterpolateError> {
        self.lock().clone()
    }

    /// Remove and return the collected errors
    pub fn take(&self) -> Vec<InterpolateError> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, error: &InterpolateError) {
        self.lock().push(error.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InterpolateError {
        InterpolateError::Evaluation {
            text: "{{x}}".to_string(),
            cause: "boom".to_string(),
        }
    }

    #[test]
    fn test_collecting_reporter() {
        let reporter = CollectingReporter::new();
        assert!(reporter.is_empty());

        reporter.report(&sample());
        reporter.report(&sample());
        assert_eq!(reporter.len(), 2);
        assert_eq!(reporter.errors()[0], sample());

        let taken = reporter.take();
        assert_eq!(taken.len(), 2);
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_tracing_reporter_does_not_panic() {
        TracingReporter.report(&sample());
    }
}
