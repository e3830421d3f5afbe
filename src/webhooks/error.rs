//! Rejection reasons for MysqlCluster admission.
//!
//! Validation returns `Result<(), ValidationError>`; the admission server
//! turns an error into a denial, so the validator never depends on the
//! HTTP or Kubernetes response types.

use std::fmt;

use thiserror::Error;

/// Classification of a rejected spec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A field that must parse as a structured value (IP literal, quantity) does not.
    InvalidFormat,
    /// The new spec breaks a monotonicity or immutability rule relative to the old one.
    ForbiddenTransition,
    /// Two fields of the new spec contradict each other.
    ConflictingFields,
    /// A field requires a companion field that is not set.
    MissingDependency,
}

impl ErrorKind {
    /// Machine-readable reason reported in the admission response
    pub fn reason(self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat => "InvalidFormat",
            ErrorKind::ForbiddenTransition => "ForbiddenTransition",
            ErrorKind::ConflictingFields => "ConflictingFields",
            ErrorKind::MissingDependency => "MissingDependency",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Why a MysqlCluster spec was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidFormat { field: &'static str, message: String },

    #[error("{field}: {message}")]
    ForbiddenTransition { field: &'static str, message: String },

    #[error("{message}")]
    ConflictingFields { message: String },

    #[error("{message}")]
    MissingDependency { message: String },
}

impl ValidationError {
    pub fn invalid_format(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field,
            message: message.into(),
        }
    }

    pub fn forbidden_transition(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError::ForbiddenTransition {
            field,
            message: message.into(),
        }
    }

    pub fn conflicting_fields(message: impl Into<String>) -> Self {
        ValidationError::ConflictingFields {
            message: message.into(),
        }
    }

    pub fn missing_dependency(message: impl Into<String>) -> Self {
        ValidationError::MissingDependency {
            message: message.into(),
        }
    }

    /// The kind of rule this error violates
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            ValidationError::ForbiddenTransition { .. } => ErrorKind::ForbiddenTransition,
            ValidationError::ConflictingFields { .. } => ErrorKind::ConflictingFields,
            ValidationError::MissingDependency { .. } => ErrorKind::MissingDependency,
        }
    }
}

/// Result type alias for validation checks
pub type Result<T> = std::result::Result<T, ValidationError>;
