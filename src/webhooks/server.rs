//! Admission webhook server.
//!
//! Provides the HTTP endpoint Kubernetes calls for MysqlCluster admission.
//!
//! To enable the webhook:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration for CREATE, UPDATE and DELETE
//! 3. Mount the TLS certificate secret to the pod at /etc/webhook/certs/
//!
//! The webhook server starts automatically when certificates are present.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use kube::Resource;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::crd::MysqlCluster;
use crate::health::HealthState;
use crate::webhooks::policies::ValidationResult;
use crate::webhooks::validator::{AdmissionOperation, SpecValidator};

/// Path the ValidatingWebhookConfiguration points at
pub const VALIDATE_PATH: &str = "/validate-mysql-radondb-com-v1alpha1-mysqlcluster";

/// Shared state for webhook handlers
pub struct WebhookState {
    pub validator: SpecValidator,
    pub health: Option<Arc<HealthState>>,
}

impl WebhookState {
    pub fn new(validator: SpecValidator, health: Option<Arc<HealthState>>) -> Self {
        Self { validator, health }
    }
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason<T: Resource<DynamicType = ()>>(
    request: &AdmissionRequest<T>,
    message: &str,
    reason: &str,
) -> AdmissionReview<DynamicObject> {
    let full_message = format!("[{}] {}", reason, message);
    AdmissionResponse::from(request)
        .deny(full_message)
        .into_review()
}

/// Metric label for an admission operation
fn operation_label(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "CREATE",
        Operation::Update => "UPDATE",
        Operation::Delete => "DELETE",
        Operation::Connect => "CONNECT",
    }
}

/// Decide an admission request
///
/// Maps the request onto the snapshots each phase needs. DELETE without an
/// old object and CONNECT carry nothing to validate and are allowed.
pub fn admit(
    validator: &SpecValidator,
    request: &AdmissionRequest<MysqlCluster>,
) -> ValidationResult {
    let new = request.object.as_ref();
    let old = request.old_object.as_ref();

    let operation = match (&request.operation, new, old) {
        (Operation::Create, Some(new), _) => AdmissionOperation::Create { new },
        (Operation::Update, Some(new), Some(old)) => AdmissionOperation::Update { old, new },
        (Operation::Delete, _, Some(old)) => AdmissionOperation::Delete { old },
        (Operation::Delete, _, None) | (Operation::Connect, _, _) => {
            return ValidationResult::allowed();
        }
        (Operation::Create, None, _) | (Operation::Update, None, _) => {
            return ValidationResult::denied("InvalidRequest", "Missing object in request");
        }
        (Operation::Update, Some(_), None) => {
            return ValidationResult::denied(
                "InvalidRequest",
                "Missing oldObject in UPDATE request",
            );
        }
    };

    validator.validate(operation).into()
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(VALIDATE_PATH, post(validate_mysqlcluster))
        .with_state(state)
}

/// MysqlCluster admission webhook handler
async fn validate_mysqlcluster(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<MysqlCluster>>,
) -> impl IntoResponse {
    let request: AdmissionRequest<MysqlCluster> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = %request.name,
        "Processing admission request"
    );

    let started = Instant::now();
    let result = admit(&state.validator, &request);

    if let Some(health) = &state.health {
        health.metrics.record_admission(
            operation_label(&request.operation),
            result.allowed,
            result.reason.as_deref(),
            started.elapsed().as_secs_f64(),
        );
    }

    if !result.allowed {
        let reason = result
            .reason
            .unwrap_or_else(|| "ValidationFailed".to_string());
        let message = result
            .message
            .unwrap_or_else(|| "Validation failed".to_string());
        warn!(uid = %uid, reason = %reason, message = %message, "Admission request denied");
        return (
            StatusCode::OK,
            Json(deny_with_reason(&request, &message, &reason)),
        );
    }

    info!(uid = %uid, operation = ?request.operation, "Admission request allowed");
    (
        StatusCode::OK,
        Json(AdmissionResponse::from(&request).into_review()),
    )
}

/// Errors that can occur when running the webhook server
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    #[error("Webhook server error: {0}")]
    Server(String),
}

/// Run the webhook server with TLS
///
/// Binds to `0.0.0.0:<port>` and serves the MysqlCluster validation endpoint.
///
/// # Arguments
/// * `state` - Validator and optional health state shared by handlers
/// * `cert_path` - Path to TLS certificate file (PEM format)
/// * `key_path` - Path to TLS private key file (PEM format)
/// * `port` - Port to listen on
pub async fn run_webhook_server(
    state: Arc<WebhookState>,
    cert_path: &Path,
    key_path: &Path,
    port: u16,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;

    let app = create_webhook_router(state);

    let config = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port, path = VALIDATE_PATH, "Webhook server listening with TLS");

    axum_server::bind_rustls(addr, config)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}
