//! Admission-time validator for MysqlCluster specs.
//!
//! `SpecValidator` is stateless apart from the tracing span it was built
//! with, so one instance can serve concurrent admission requests.
//!
//! Check order on UPDATE (first failure wins):
//! 1. volume size
//! 2. table name case
//! 3. image/version consistency
//! 4. backup target, evaluated against the OLD spec
//!
//! CREATE runs only the backup target check against the new spec. DELETE is
//! always accepted.

use kube::ResourceExt;
use tracing::{Span, info, info_span, warn};

use super::error::Result;
use super::policies::{backup_target, image_version, table_case, volume_size};
use crate::crd::MysqlCluster;

/// An admission event and the snapshots it carries
#[derive(Debug, Clone, Copy)]
pub enum AdmissionOperation<'a> {
    Create {
        new: &'a MysqlCluster,
    },
    Update {
        old: &'a MysqlCluster,
        new: &'a MysqlCluster,
    },
    Delete {
        old: &'a MysqlCluster,
    },
}

impl<'a> AdmissionOperation<'a> {
    /// Lowercase phase name used in logs
    pub fn phase(&self) -> &'static str {
        match self {
            AdmissionOperation::Create { .. } => "create",
            AdmissionOperation::Update { .. } => "update",
            AdmissionOperation::Delete { .. } => "delete",
        }
    }

    /// The object the request is about (new for create/update, old for delete)
    pub fn resource(&self) -> &'a MysqlCluster {
        match *self {
            AdmissionOperation::Create { new } | AdmissionOperation::Update { new, .. } => new,
            AdmissionOperation::Delete { old } => old,
        }
    }
}

/// Validates MysqlCluster admission events
#[derive(Debug, Clone)]
pub struct SpecValidator {
    span: Span,
}

impl Default for SpecValidator {
    fn default() -> Self {
        Self::new(info_span!("mysqlcluster-resource"))
    }
}

impl SpecValidator {
    /// Create a validator whose per-call spans are children of `span`
    pub fn new(span: Span) -> Self {
        Self { span }
    }

    /// Validate an admission event
    pub fn validate(&self, operation: AdmissionOperation<'_>) -> Result<()> {
        let resource = operation.resource();
        let phase = operation.phase();
        let name = resource.name_any();
        let namespace = resource.namespace().unwrap_or_default();
        let span = info_span!(
            parent: &self.span,
            "validate",
            phase,
            name = %name,
            namespace = %namespace,
        );
        let _guard = span.enter();

        info!("validate {}", phase);

        let result = match operation {
            AdmissionOperation::Create { new } => check_create(new),
            AdmissionOperation::Update { old, new } => check_update(old, new),
            AdmissionOperation::Delete { .. } => Ok(()),
        };

        if let Err(e) = &result {
            warn!(reason = e.kind().reason(), error = %e, "MysqlCluster spec rejected");
        }

        result
    }

    /// Validate a new object
    pub fn validate_create(&self, new: &MysqlCluster) -> Result<()> {
        self.validate(AdmissionOperation::Create { new })
    }

    /// Validate a change from `old` to `new`
    pub fn validate_update(&self, old: &MysqlCluster, new: &MysqlCluster) -> Result<()> {
        self.validate(AdmissionOperation::Update { old, new })
    }

    /// Validate a deletion (always accepted)
    pub fn validate_delete(&self, old: &MysqlCluster) -> Result<()> {
        self.validate(AdmissionOperation::Delete { old })
    }
}

fn check_create(new: &MysqlCluster) -> Result<()> {
    backup_target::validate(&new.spec)
}

fn check_update(old: &MysqlCluster, new: &MysqlCluster) -> Result<()> {
    volume_size::validate(&old.spec, &new.spec)?;
    table_case::validate(&old.spec, &new.spec)?;
    image_version::validate(&new.spec)?;
    // Backup settings are read from the stored spec, not the incoming one
    backup_target::validate(&old.spec)?;
    Ok(())
}
