//! Raw reading preparation.
//!
//! Readings arrive as strings. [`prepare_value`] turns one into the number
//! that is looked up in the boundary index, or into the sentinel outcome that
//! short-circuits classification.

use crate::severity::Severity;

/// Literal reading value reported when a collector timed out.
pub const TIMEOUT_SENTINEL: &str = "Timeout";

/// Why a raw reading did not produce a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadingError {
    #[error("Invalid reading value: {0:?}")]
    InvalidValue(Option<String>),

    #[error("Reading timed out")]
    Timeout,
}

impl ReadingError {
    /// The severity a reading with this error resolves to.
    pub fn severity(&self) -> Severity {
        match self {
            ReadingError::InvalidValue(_) => Severity::Invalid,
            ReadingError::Timeout => Severity::Timeout,
        }
    }
}

/// Convert a raw reading into a finite number.
///
/// - absent or empty -> `InvalidValue`
/// - exactly `"Timeout"` -> `Timeout`
/// - `"true"` / `"false"` (any case) -> `1` / `0`
/// - anything else is parsed as a float (surrounding whitespace ignored);
///   unparseable or non-finite values are `InvalidValue`.
pub fn prepare_value(raw: Option<&str>) -> Result<f64, ReadingError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(ReadingError::InvalidValue(raw.map(str::to_string))),
    };

    if raw == TIMEOUT_SENTINEL {
        return Err(ReadingError::Timeout);
    }
    if raw.eq_ignore_ascii_case("true") {
        return Ok(1.0);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Ok(0.0);
    }

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ReadingError::InvalidValue(Some(raw.to_string()))),
    }
}
