//! Image/version consistency policy.
//!
//! Validates:
//! - When both `mysqlOpts.image` and `mysqlVersion` are set, the image
//!   reference contains the version string

use crate::crd::MysqlClusterSpec;
use crate::webhooks::error::{Result, ValidationError};

/// Validate that the image and the declared version agree
pub fn validate(spec: &MysqlClusterSpec) -> Result<()> {
    let image = spec.mysql_opts.image.as_str();
    let version = spec.mysql_version.as_str();

    if !image.is_empty() && !version.is_empty() && !image.contains(version) {
        return Err(ValidationError::conflicting_fields(format!(
            "spec.mysqlOpts.image '{}' and spec.mysqlVersion '{}' are conflict",
            image, version
        )));
    }

    Ok(())
}
