//! Workload compilation error types
//!
//! Every error names the service it was raised for, so a caller compiling a whole
//! stack can report failures per service.

use thiserror::Error;

/// Errors that can occur during workload compilation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompilationError {
    /// A resource quantity could not be parsed
    #[error("service '{service}': {source}")]
    Quantity {
        /// Service being compiled
        service: String,
        /// Underlying validation error
        #[source]
        source: stack_common::Error,
    },

    /// The health check declares neither an HTTP nor a command check
    #[error("service '{service}': healthcheck needs either an http check or a test command")]
    InvalidHealthcheck {
        /// Service being compiled
        service: String,
    },
}

impl CompilationError {
    /// Create a quantity error
    pub fn quantity(service: &str, source: stack_common::Error) -> Self {
        Self::Quantity {
            service: service.to_string(),
            source,
        }
    }

    /// Create an invalid healthcheck error
    pub fn invalid_healthcheck(service: &str) -> Self {
        Self::InvalidHealthcheck {
            service: service.to_string(),
        }
    }

    /// Service the error was raised for
    pub fn service(&self) -> &str {
        match self {
            Self::Quantity { service, .. } | Self::InvalidHealthcheck { service } => service,
        }
    }
}
