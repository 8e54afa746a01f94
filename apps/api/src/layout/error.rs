use thiserror::Error;

/// Errors raised by the slicing optimizer and its helpers.
///
/// Everything past input validation is plain arithmetic, so the only failure
/// mode is bad input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl LayoutError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        LayoutError::InvalidInput(msg.into())
    }
}

/// Returns `Ok(value)` if it is finite and strictly positive.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LayoutError::invalid(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}
