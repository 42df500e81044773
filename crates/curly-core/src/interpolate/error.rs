//! Interpolation error types

use thiserror::Error;

use crate::expr::ParseError;
use crate::trust::TrustError;

/// Errors raised while configuring, compiling or evaluating interpolations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpolateError {
    /// An embedded expression failed to parse (compile time)
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A trusted-context interpolation mixed text or several expressions (compile time)
    #[error(
        "NOCONCAT: Error while interpolating: {text}\nStrict contextual escaping disallows interpolations that concatenate multiple expressions when a trusted value is required"
    )]
    DisallowedConcatenation { text: String },

    /// A value could not be certified for its sink (evaluation time, propagated)
    #[error(transparent)]
    TrustViolation(#[from] TrustError),

    /// An expression failed during evaluation (reported, not propagated)
    #[error("INTERR: Can't interpolate: {text}\n{cause}")]
    Evaluation { text: String, cause: String },

    /// Marker symbols were rejected
    #[error("INVALID_MARKERS: {0}")]
    InvalidMarkers(String),
}
