//! Table name case immutability policy.
//!
//! UPDATE only.
//!
//! MySQL 8.0 fixes `lower_case_table_names` when the data directory is
//! initialized; a server started with a different value refuses to boot.
//!
//! Validates:
//! - For images containing "8.0", `mysqlConf.lower_case_table_names` is
//!   unchanged between old and new spec (unset counts as empty)

use crate::crd::MysqlClusterSpec;
use crate::webhooks::error::{Result, ValidationError};

/// Image token that turns the rule on
const MYSQL_80_TOKEN: &str = "8.0";

/// Validate that `lower_case_table_names` does not change on MySQL 8.0
pub fn validate(old: &MysqlClusterSpec, new: &MysqlClusterSpec) -> Result<()> {
    if !new.mysql_opts.image.contains(MYSQL_80_TOKEN) {
        return Ok(());
    }

    let before = old.lower_case_table_names();
    let after = new.lower_case_table_names();
    if before != after {
        return Err(ValidationError::forbidden_transition(
            "spec.mysqlOpts.mysqlConf.lower_case_table_names",
            format!(
                "lower_case_table_names cannot be changed in MySQL8.0+ (from '{}' to '{}')",
                before, after
            ),
        ));
    }

    Ok(())
}
