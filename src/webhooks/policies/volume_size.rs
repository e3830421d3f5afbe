//! Volume size policy.
//!
//! UPDATE only.
//!
//! Validates:
//! - `persistence.size` parses as a quantity on both old and new spec
//! - The volume never shrinks (compared by magnitude, not by string)

use crate::crd::MysqlClusterSpec;
use crate::quantity::Quantity;
use crate::webhooks::error::{Result, ValidationError};

const FIELD: &str = "spec.persistence.size";

/// Validate that the persistence size does not decrease
pub fn validate(old: &MysqlClusterSpec, new: &MysqlClusterSpec) -> Result<()> {
    let old_size = parse_size(&old.persistence.size)?;
    let new_size = parse_size(&new.persistence.size)?;

    if new_size < old_size {
        return Err(ValidationError::forbidden_transition(
            FIELD,
            format!(
                "volume size cannot be decreased (from {} to {})",
                old_size.as_str(),
                new_size.as_str()
            ),
        ));
    }

    Ok(())
}

fn parse_size(size: &str) -> Result<Quantity> {
    Quantity::parse(size).map_err(|e| ValidationError::invalid_format(FIELD, e.to_string()))
}
