//! Backup target validation policy.
//!
//! Enforced on CREATE (against the new spec) and on UPDATE.
//!
//! Validates:
//! - `nfsServerAddress`, when set, is an IPv4 or IPv6 literal
//! - `backupSchedule` has somewhere to write to: a `backupSecretName` or a
//!   valid `nfsServerAddress`

use std::net::IpAddr;

use crate::crd::MysqlClusterSpec;
use crate::webhooks::error::{Result, ValidationError};

/// Validate the NFS address and the backup schedule's dependencies
pub fn validate(spec: &MysqlClusterSpec) -> Result<()> {
    let address = spec.nfs_server_address.as_str();
    let is_ip = address.parse::<IpAddr>().is_ok();

    if !address.is_empty() && !is_ip {
        return Err(ValidationError::invalid_format(
            "spec.nfsServerAddress",
            format!("nfsServerAddress should be set as IP (got '{}')", address),
        ));
    }

    if !spec.backup_schedule.is_empty() && spec.backup_secret_name.is_empty() && !is_ip {
        return Err(ValidationError::missing_dependency(
            "backupSchedule is set without any backupSecretName or nfsServerAddress",
        ));
    }

    Ok(())
}
