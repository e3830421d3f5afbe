//! Custom Resource Definitions (CRDs) for mysql-operator.
//!
//! - `MysqlCluster`: Desired state of a replicated MySQL cluster

mod mysql_cluster;

pub use mysql_cluster::*;
