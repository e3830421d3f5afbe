//! mysql-operator library crate
//!
//! Admission-time validation for `MysqlCluster` resources: the CRD types,
//! the quantity parser, the spec validator and the HTTPS webhook serving it.

pub mod config;
pub mod crd;
pub mod health;
pub mod quantity;
pub mod webhooks;

pub use config::WebhookConfig;
pub use health::HealthState;
pub use webhooks::{
    AdmissionOperation, ErrorKind, SpecValidator, ValidationError, WebhookError, WebhookState,
    run_webhook_server,
};
