//! Webhook module for validating MysqlCluster admission requests.
//!
//! - `validator`: the stateless decision function, one arm per operation
//! - `policies`: the individual checks it runs
//! - `server`: HTTPS endpoint that adapts AdmissionReviews to the validator

pub mod error;
pub mod policies;
mod server;
pub mod validator;

pub use error::{ErrorKind, ValidationError};
pub use policies::ValidationResult;
pub use server::{
    VALIDATE_PATH, WebhookError, WebhookState, admit, create_webhook_router, run_webhook_server,
};
pub use validator::{AdmissionOperation, SpecValidator};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
