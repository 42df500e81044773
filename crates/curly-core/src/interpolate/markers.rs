//! Marker symbol configuration

use super::error::InterpolateError;
use crate::config::consts::markers::{END, ESCAPED_END, ESCAPED_START, START};

/// Start/end symbols delimiting expressions, plus their escaped forms
///
/// Values are immutable once handed to an [`Interpolator`](super::Interpolator);
/// changing markers means building a new interpolator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    start: String,
    end: String,
    escaped_start: String,
    escaped_end: String,
}

impl Markers {
    /// Custom start/end symbols with the default escaped symbols
    ///
    /// # Errors
    ///
    /// Returns [`InterpolateError::InvalidMarkers`] if either symbol is empty.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, InterpolateError> {
        let start = start.into();
        let end = end.into();
        ensure_non_empty("start symbol", &start)?;
        ensure_non_empty("end symbol", &end)?;

        Ok(Self {
            start,
            end,
            escaped_start: ESCAPED_START.to_string(),
            escaped_end: ESCAPED_END.to_string(),
        })
    }

    /// Replace the escaped symbols
    ///
    /// An escaped symbol identical to its plain counterpart is ignored and the
    /// previous escaped symbol is kept.
    pub fn with_escaped(
        mut self,
        escaped_start: impl Into<String>,
        escaped_end: impl Into<String>,
    ) -> Result<Self, InterpolateError> {
        let escaped_start = escaped_start.into();
        let escaped_end = escaped_end.into();
        ensure_non_empty("escaped start symbol", &escaped_start)?;
        ensure_non_empty("escaped end symbol", &escaped_end)?;

        if escaped_start != self.start {
            self.escaped_start = escaped_start;
        }
        if escaped_end != self.end {
            self.escaped_end = escaped_end;
        }
        Ok(self)
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn escaped_start(&self) -> &str {
        &self.escaped_start
    }

    pub fn escaped_end(&self) -> &str {
        &self.escaped_end
    }

    /// The escaped pair, or `None` when it collides with the plain pair
    pub(crate) fn escape_pair(&self) -> Option<(&str, &str)> {
        if self.escaped_start == self.start || self.escaped_end == self.end {
            None
        } else {
            Some((&self.escaped_start, &self.escaped_end))
        }
    }

    /// Whether the escaped start symbol textually begins with the start symbol
    pub(crate) fn similar_start_symbols(&self) -> bool {
        self.escape_pair().is_some() && self.escaped_start.starts_with(&self.start)
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            start: START.to_string(),
            end: END.to_string(),
            escaped_start: ESCAPED_START.to_string(),
            escaped_end: ESCAPED_END.to_string(),
        }
    }
}

fn ensure_non_empty(what: &str, symbol: &str) -> Result<(), InterpolateError> {
    if symbol.is_empty() {
        return Err(InterpolateError::InvalidMarkers(format!("{} must not be empty", what)));
    }
    Ok(())
}
