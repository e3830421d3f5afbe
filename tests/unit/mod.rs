//! Unit tests for mysql-operator.
//!
//! These tests run without a Kubernetes cluster and drive the validator
//! through its public API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

#[path = "../common/mod.rs"]
mod common;

mod scenario_tests {
    use super::common::fixtures::{MysqlClusterBuilder, mysql80_cluster};
    use mysql_operator::{ErrorKind, SpecValidator};

    #[test]
    fn test_create_with_hostname_nfs_address() {
        let new = MysqlClusterBuilder::default()
            .nfs_server_address("not-an-ip")
            .build();

        let err = SpecValidator::default().validate_create(&new).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn test_update_shrinking_volume() {
        let old = MysqlClusterBuilder::default().size("10Gi").build();
        let new = MysqlClusterBuilder::default().size("5Gi").build();

        let err = SpecValidator::default()
            .validate_update(&old, &new)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ForbiddenTransition);
        assert!(err.to_string().contains("volume size cannot be decreased"));
    }

    #[test]
    fn test_update_changing_table_case_on_80() {
        let old = mysql80_cluster().lower_case_table_names("1").build();
        let new = mysql80_cluster().lower_case_table_names("2").build();

        let err = SpecValidator::default()
            .validate_update(&old, &new)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ForbiddenTransition);
        assert!(err.to_string().contains("lower_case_table_names"));
    }

    #[test]
    fn test_update_image_version_conflict() {
        let old = MysqlClusterBuilder::default().build();
        let new = MysqlClusterBuilder::default()
            .image("mysql:5.7.34")
            .mysql_version("8.0")
            .build();

        let err = SpecValidator::default()
            .validate_update(&old, &new)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConflictingFields);
    }

    #[test]
    fn test_create_schedule_without_target() {
        let new = MysqlClusterBuilder::default()
            .backup_schedule("0 0 * * *")
            .backup_secret_name("")
            .nfs_server_address("")
            .build();

        let err = SpecValidator::default().validate_create(&new).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);
    }

    #[test]
    fn test_update_growing_volume_accepted() {
        let old = mysql80_cluster()
            .size("10Gi")
            .lower_case_table_names("1")
            .build();
        let new = mysql80_cluster()
            .size("20Gi")
            .lower_case_table_names("1")
            .build();

        assert!(SpecValidator::default().validate_update(&old, &new).is_ok());
    }
}

mod backup_tests {
    use super::common::fixtures::MysqlClusterBuilder;
    use mysql_operator::{ErrorKind, SpecValidator};

    #[test]
    fn test_create_schedule_with_secret() {
        let new = MysqlClusterBuilder::default()
            .backup_schedule("0 0 * * *")
            .backup_secret_name("s3-credentials")
            .build();
        assert!(SpecValidator::default().validate_create(&new).is_ok());
    }

    #[test]
    fn test_create_schedule_with_nfs() {
        let new = MysqlClusterBuilder::default()
            .backup_schedule("0 0 * * *")
            .nfs_server_address("10.96.0.15")
            .build();
        assert!(SpecValidator::default().validate_create(&new).is_ok());
    }

    #[test]
    fn test_update_checks_stored_backup_settings() {
        // A stored spec with a dangling schedule blocks every update
        let old = MysqlClusterBuilder::default()
            .backup_schedule("0 0 * * *")
            .build();
        let new = MysqlClusterBuilder::default()
            .backup_schedule("0 0 * * *")
            .backup_secret_name("s3-credentials")
            .build();

        let err = SpecValidator::default()
            .validate_update(&old, &new)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingDependency);
    }

    #[test]
    fn test_update_does_not_check_new_backup_settings() {
        let old = MysqlClusterBuilder::default().build();
        let new = MysqlClusterBuilder::default()
            .nfs_server_address("nfs.example.com")
            .build();
        assert!(SpecValidator::default().validate_update(&old, &new).is_ok());
    }
}

mod delete_tests {
    use super::common::fixtures::MysqlClusterBuilder;
    use mysql_operator::SpecValidator;

    #[test]
    fn test_delete_ignores_spec() {
        let old = MysqlClusterBuilder::default()
            .size("not-a-size")
            .nfs_server_address("not-an-ip")
            .backup_schedule("@daily")
            .build();
        assert!(SpecValidator::default().validate_delete(&old).is_ok());
    }
}

mod admission_tests {
    use super::common::fixtures::MysqlClusterBuilder;
    use mysql_operator::webhooks::{AdmissionRequest, AdmissionReview, admit};
    use mysql_operator::{SpecValidator, crd::MysqlCluster};
    use serde_json::json;

    fn request(
        operation: &str,
        object: Option<&MysqlCluster>,
        old: Option<&MysqlCluster>,
    ) -> AdmissionRequest<MysqlCluster> {
        let review: AdmissionReview<MysqlCluster> = serde_json::from_value(json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "e911857d-c318-11e8-bbad-025000000001",
                "kind": {"group": "mysql.radondb.com", "version": "v1alpha1", "kind": "MysqlCluster"},
                "resource": {"group": "mysql.radondb.com", "version": "v1alpha1", "resource": "mysqlclusters"},
                "name": "sample",
                "namespace": "default",
                "operation": operation,
                "userInfo": {"username": "admin"},
                "object": object,
                "oldObject": old,
                "dryRun": false
            }
        }))
        .unwrap();
        review.try_into().unwrap()
    }

    #[test]
    fn test_admit_update_denied_with_reason() {
        let old = MysqlClusterBuilder::default().size("20Gi").build();
        let new = MysqlClusterBuilder::default().size("10Gi").build();

        let result = admit(
            &SpecValidator::default(),
            &request("UPDATE", Some(&new), Some(&old)),
        );
        assert!(!result.allowed);
        assert_eq!(result.reason.as_deref(), Some("ForbiddenTransition"));
        assert!(result.message.unwrap().contains("spec.persistence.size"));
    }

    #[test]
    fn test_admit_connect_allowed() {
        let result = admit(&SpecValidator::default(), &request("CONNECT", None, None));
        assert!(result.allowed);
    }

    #[test]
    fn test_admit_delete_without_old_object_allowed() {
        let result = admit(&SpecValidator::default(), &request("DELETE", None, None));
        assert!(result.allowed);
    }
}
