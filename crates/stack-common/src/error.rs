//! Error types shared by the stack compiler crates

use thiserror::Error;

/// Result alias using the shared [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while interpreting a stack description
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A resource quantity string could not be parsed
    #[error("invalid quantity for {field}: '{value}' (expected e.g., {expected})")]
    InvalidQuantity {
        /// Field the quantity was read from (e.g., "limits.cpu")
        field: String,
        /// The offending value
        value: String,
        /// Human readable example of a valid value
        expected: &'static str,
    },

    /// The stack description breaks a structural invariant
    #[error("validation error: {message}")]
    Validation {
        /// Description of what's invalid
        message: String,
    },
}

impl Error {
    /// Create a validation error with the given message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a quantity error for a field
    pub fn invalid_quantity(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidQuantity {
            field: field.into(),
            value: value.into(),
            expected,
        }
    }
}
