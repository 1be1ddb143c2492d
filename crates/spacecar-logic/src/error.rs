//! Errors raised by the models when given input they cannot score.

use thiserror::Error;

/// Invalid model input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("thrust must be positive to estimate fuel usage, got {0} kN")]
    NonPositiveThrust(f64),
}

/// Reject NaN and infinities for a named input.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFinite { field, value })
    }
}
