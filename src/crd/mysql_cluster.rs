//! MysqlCluster Custom Resource Definition.
//!
//! Only the admission webhook in this crate reads these types; reconciliation
//! lives in a separate controller that shares the same schema.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `mysqlConf` key whose value is fixed once a MySQL 8.0 data directory exists.
pub const LOWER_CASE_TABLE_NAMES: &str = "lower_case_table_names";

/// MysqlCluster is a custom resource describing a replicated MySQL cluster.
///
/// Example:
/// ```yaml
/// apiVersion: mysql.radondb.com/v1alpha1
/// kind: MysqlCluster
/// metadata:
///   name: sample
/// spec:
///   replicas: 3
///   mysqlVersion: "8.0"
///   mysqlOpts:
///     image: radondb/percona:8.0.25
///     mysqlConf:
///       lower_case_table_names: "1"
///   persistence:
///     size: 20Gi
///   backupSchedule: "0 0 * * *"
///   nfsServerAddress: 10.96.0.15
/// ```
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "mysql.radondb.com",
    version = "v1alpha1",
    kind = "MysqlCluster",
    plural = "mysqlclusters",
    shortname = "mysql",
    status = "MysqlClusterStatus",
    namespaced,
    printcolumn = r#"{"name":"Ready", "type":"string", "jsonPath":".status.readyNodes"}"#,
    printcolumn = r#"{"name":"State", "type":"string", "jsonPath":".status.state"}"#,
    printcolumn = r#"{"name":"Replicas", "type":"integer", "jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct MysqlClusterSpec {
    /// Number of MySQL nodes (default 3).
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// MySQL major/minor version, e.g. "5.7" or "8.0".
    /// When set together with `mysqlOpts.image`, the image must contain it.
    #[serde(default = "default_mysql_version")]
    pub mysql_version: String,

    /// MySQL container options.
    #[serde(default)]
    pub mysql_opts: MysqlOpts,

    /// Data volume configuration.
    #[serde(default)]
    pub persistence: Persistence,

    /// Name of the Secret holding S3 backup credentials.
    #[serde(default)]
    pub backup_secret_name: String,

    /// Cron expression for scheduled backups.
    /// Requires either `backupSecretName` or `nfsServerAddress`.
    #[serde(default)]
    pub backup_schedule: String,

    /// IP address of an NFS server used as backup target.
    #[serde(default)]
    pub nfs_server_address: String,
}

impl Default for MysqlClusterSpec {
    fn default() -> Self {
        Self {
            replicas: default_replicas(),
            mysql_version: default_mysql_version(),
            mysql_opts: MysqlOpts::default(),
            persistence: Persistence::default(),
            backup_secret_name: String::new(),
            backup_schedule: String::new(),
            nfs_server_address: String::new(),
        }
    }
}

impl MysqlClusterSpec {
    /// Value of `lower_case_table_names` in `mysqlConf`, empty when unset.
    pub fn lower_case_table_names(&self) -> &str {
        self.mysql_opts
            .mysql_conf
            .get(LOWER_CASE_TABLE_NAMES)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

fn default_replicas() -> i32 {
    3
}

fn default_mysql_version() -> String {
    "5.7".to_string()
}

/// MySQL container options.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MysqlOpts {
    /// MySQL container image.
    #[serde(default = "default_mysql_image")]
    pub image: String,

    /// Entries rendered into the `[mysqld]` section of my.cnf.
    #[serde(default)]
    pub mysql_conf: BTreeMap<String, String>,
}

impl Default for MysqlOpts {
    fn default() -> Self {
        Self {
            image: default_mysql_image(),
            mysql_conf: BTreeMap::new(),
        }
    }
}

fn default_mysql_image() -> String {
    "radondb/percona:5.7".to_string()
}

/// Data volume configuration.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Persistence {
    /// Access modes of the PersistentVolumeClaim (default: ReadWriteOnce).
    #[serde(default = "default_access_modes")]
    pub access_modes: Vec<String>,

    /// Storage class name. If not set, uses the cluster default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// Size of the PersistentVolumeClaim (default: 10Gi). May only grow.
    #[serde(default = "default_storage_size")]
    pub size: String,
}

impl Default for Persistence {
    fn default() -> Self {
        Self {
            access_modes: default_access_modes(),
            storage_class: None,
            size: default_storage_size(),
        }
    }
}

fn default_access_modes() -> Vec<String> {
    vec!["ReadWriteOnce".to_string()]
}

fn default_storage_size() -> String {
    "10Gi".to_string()
}

/// Observed state, written by the controller.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MysqlClusterStatus {
    /// Cluster state, e.g. "Initializing", "Ready", "Error".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Number of ready MySQL nodes.
    #[serde(default)]
    pub ready_nodes: i32,

    /// Conditions describing the current state.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// Condition describes the state of a cluster at a certain point.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition.
    pub r#type: String,
    /// Status of the condition ("True", "False", "Unknown").
    pub status: String,
    /// Machine-readable reason for the condition's last transition.
    #[serde(default)]
    pub reason: String,
    /// Human-readable message indicating details about last transition.
    #[serde(default)]
    pub message: String,
    /// Last time the condition transitioned from one status to another.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}
