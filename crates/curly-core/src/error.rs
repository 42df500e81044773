use std::path::PathBuf;
use thiserror::Error;

use crate::interpolate::InterpolateError;
use crate::trust::TrustError;

#[derive(Error, Debug)]
pub enum CurlyError {
    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID: failed to parse curly.toml: {0}")]
    ConfigInvalid(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // Context errors
    #[error("CONTEXT_INVALID: failed to load context from '{path}': {reason}")]
    ContextInvalid { path: PathBuf, reason: String },

    // Interpolation errors
    #[error(transparent)]
    Interpolate(#[from] InterpolateError),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<TrustError> for CurlyError {
    fn from(err: TrustError) -> Self {
        CurlyError::Interpolate(InterpolateError::TrustViolation(err))
    }
}

pub type Result<T> = std::result::Result<T, CurlyError>;
