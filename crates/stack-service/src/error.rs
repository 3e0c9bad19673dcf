//! Error types for stack-level compilation

use stack_workload::CompilationError;
use thiserror::Error;

/// Errors raised while compiling a stack, reported per service or endpoint
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The service's workload could not be built
    #[error(transparent)]
    Workload(#[from] CompilationError),

    /// A routing rule names a service absent from the stack
    #[error("service '{service}' referenced by '{referenced_by}' is not defined in the stack")]
    ServiceNotFound {
        /// Missing service
        service: String,
        /// Endpoint or object holding the reference
        referenced_by: String,
    },

    /// The metadata snapshot could not be built or read back
    #[error("metadata snapshot: {message}")]
    Snapshot {
        /// What went wrong
        message: String,
    },
}

impl CompileError {
    /// Create a missing-service error
    pub fn service_not_found(service: &str, referenced_by: &str) -> Self {
        Self::ServiceNotFound {
            service: service.to_string(),
            referenced_by: referenced_by.to_string(),
        }
    }

    /// Create a snapshot error
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }
}
