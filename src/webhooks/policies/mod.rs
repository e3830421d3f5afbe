//! Validation policies for MysqlCluster admission webhooks.
//!
//! Policies are organized by the snapshots they need:
//! - Spec policies: look at a single spec (backup target, image/version)
//! - Transition policies: compare old and new spec on UPDATE (volume size,
//!   table name case)
//!
//! Every policy returns `Ok(())` or the first rule it finds broken.

pub mod backup_target;
pub mod image_version;
pub mod table_case;
pub mod volume_size;

use super::error::ValidationError;

/// Result of an admission decision, in the shape the webhook reports it
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub allowed: bool,
    /// Reason for denial (if not allowed)
    pub reason: Option<String>,
    /// Detailed message (if not allowed)
    pub message: Option<String>,
}

impl ValidationResult {
    /// Create an allowed result
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: None,
            message: None,
        }
    }

    /// Create a denied result
    pub fn denied(reason: &str, message: &str) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.to_string()),
            message: Some(message.to_string()),
        }
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self::allowed(),
            Err(e) => Self::denied(e.kind().reason(), &e.to_string()),
        }
    }
}
