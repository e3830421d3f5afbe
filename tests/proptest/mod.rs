// Test code is allowed to panic on failure
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

//! Property-based tests for mysql-operator.
//!
//! Uses proptest to generate random inputs and verify the validator's
//! invariants.

#[path = "../common/mod.rs"]
mod common;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use proptest::prelude::*;

use common::fixtures::{MysqlClusterBuilder, mysql80_cluster};
use mysql_operator::quantity::Quantity;
use mysql_operator::{ErrorKind, SpecValidator};

/// Strategy for IPv4 and IPv6 literals.
fn ip_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<u32>().prop_map(|bits| IpAddr::V4(Ipv4Addr::from(bits)).to_string()),
        any::<u128>().prop_map(|bits| IpAddr::V6(Ipv6Addr::from(bits)).to_string()),
    ]
}

/// Strategy for non-empty strings that are not IP literals.
fn non_ip() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,30}".prop_filter("must not be an IP", |s| s.parse::<IpAddr>().is_err())
}

/// Strategy for binary suffixes with their exponent of 1024.
fn binary_suffix() -> impl Strategy<Value = (&'static str, u32)> {
    prop_oneof![
        Just(("Ki", 1)),
        Just(("Mi", 2)),
        Just(("Gi", 3)),
        Just(("Ti", 4)),
    ]
}

/// Strategy for storage sizes along with their value in bytes.
fn storage_size() -> impl Strategy<Value = (String, u64)> {
    (1u64..=4096, binary_suffix())
        .prop_map(|(n, (suffix, exp))| (format!("{}{}", n, suffix), n * 1024u64.pow(exp)))
}

/// Strategy for `lower_case_table_names` values.
fn table_case_value() -> impl Strategy<Value = String> {
    prop_oneof![Just("0".to_string()), Just("1".to_string()), Just("2".to_string())]
}

proptest! {
    /// Property: any IP literal passes the NFS check.
    #[test]
    fn test_ip_literal_accepted(address in ip_literal()) {
        let new = MysqlClusterBuilder::default()
            .nfs_server_address(address.clone())
            .backup_schedule("0 0 * * *")
            .build();
        prop_assert!(SpecValidator::default().validate_create(&new).is_ok(), "{}", address);
    }

    /// Property: a non-empty non-IP address is an InvalidFormat rejection.
    #[test]
    fn test_non_ip_rejected(address in non_ip()) {
        let new = MysqlClusterBuilder::default()
            .nfs_server_address(address)
            .build();
        let err = SpecValidator::default().validate_create(&new).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    /// Property: sizes compare by magnitude.
    #[test]
    fn test_quantity_order_matches_bytes(a in storage_size(), b in storage_size()) {
        let qa = Quantity::parse(&a.0).unwrap();
        let qb = Quantity::parse(&b.0).unwrap();
        prop_assert_eq!(qa.cmp(&qb), a.1.cmp(&b.1));
        prop_assert_eq!(qa.value(), i128::from(a.1));
    }

    /// Property: shrinking is always rejected and growing always passes the size check,
    /// regardless of other fields.
    #[test]
    fn test_volume_monotonic(
        old in storage_size(),
        new in storage_size(),
        version in prop_oneof![Just("5.7"), Just("8.0")],
    ) {
        let old_cluster = MysqlClusterBuilder::default().size(old.0.clone()).build();
        let new_cluster = MysqlClusterBuilder::default()
            .size(new.0.clone())
            .mysql_version(version)
            .build();

        let result = SpecValidator::default().validate_update(&old_cluster, &new_cluster);
        if new.1 < old.1 {
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::ForbiddenTransition);
        } else if let Err(e) = result {
            // Only a later check may fail
            prop_assert_eq!(e.kind(), ErrorKind::ConflictingFields);
        }
    }

    /// Property: on 8.0 images, lower_case_table_names is immutable.
    #[test]
    fn test_table_case_immutable(old in table_case_value(), new in table_case_value()) {
        let old_cluster = mysql80_cluster().lower_case_table_names(old.clone()).build();
        let new_cluster = mysql80_cluster().lower_case_table_names(new.clone()).build();

        let result = SpecValidator::default().validate_update(&old_cluster, &new_cluster);
        if old == new {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::ForbiddenTransition);
        }
    }

    /// Property: the image must contain the declared version.
    #[test]
    fn test_image_contains_version(
        image in "[a-z]{1,8}:[0-9]\\.[0-9]\\.[0-9]{1,2}",
        version in "[0-9]\\.[0-9]",
    ) {
        let old_cluster = MysqlClusterBuilder::default().build();
        let new_cluster = MysqlClusterBuilder::default()
            .image(image.clone())
            .mysql_version(version.clone())
            .build();

        let result = SpecValidator::default().validate_update(&old_cluster, &new_cluster);
        if image.contains(&version) {
            // 8.0 images still pass: old and new table case are both unset
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::ConflictingFields);
        }
    }

    /// Property: validation is deterministic.
    #[test]
    fn test_validation_deterministic(old in storage_size(), new in storage_size(), address in ".{0,20}") {
        let old_cluster = MysqlClusterBuilder::default()
            .size(old.0)
            .nfs_server_address(address.clone())
            .build();
        let new_cluster = MysqlClusterBuilder::default()
            .size(new.0)
            .nfs_server_address(address)
            .build();

        let validator = SpecValidator::default();
        prop_assert_eq!(
            validator.validate_update(&old_cluster, &new_cluster),
            validator.validate_update(&old_cluster, &new_cluster)
        );
        prop_assert_eq!(
            validator.validate_create(&new_cluster),
            validator.validate_create(&new_cluster)
        );
    }
}
