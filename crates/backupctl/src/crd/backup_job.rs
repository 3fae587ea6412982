use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Serialize, Deserialize, Clone, JsonSchema)]
#[kube(
    group = "dataprotection.kubeblocks.io",
    version = "v1alpha1",
    kind = "BackupJob",
    plural = "backupjobs",
    shortname = "bj",
    namespaced,
    status = "BackupJobStatus",
    printcolumn = r#"{"name":"PHASE", "type":"string", "jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"COMPLETION_TIME", "type":"string", "jsonPath":".status.completionTimestamp"}"#
)]
pub struct BackupJobSpec {
    /// Name of the backup policy this job was created from
    #[serde(rename = "backupPolicyName")]
    pub backup_policy_name: String,

    /// Kind of backup to take
    #[serde(rename = "backupType", default)]
    pub backup_type: BackupType,

    /// How long the resulting backup is retained, e.g. "7d"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BackupType {
    Full,
    Incremental,
    Snapshot,
}

impl Default for BackupType {
    fn default() -> Self {
        BackupType::Snapshot
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub enum BackupJobPhase {
    New,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, JsonSchema)]
pub struct BackupJobStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<BackupJobPhase>,

    /// When the backup started, RFC 3339
    #[serde(rename = "startTimestamp", skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<String>,

    /// When the backup finished, successfully or not
    #[serde(rename = "completionTimestamp", skip_serializing_if = "Option::is_none")]
    pub completion_timestamp: Option<String>,

    #[serde(rename = "failureReason", skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,

    /// Human-readable size of the backup, e.g. "1.2Gi"
    #[serde(rename = "totalSize", skip_serializing_if = "Option::is_none")]
    pub total_size: Option<String>,
}
