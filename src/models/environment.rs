use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Static provisioning metadata for one sandbox environment, written to disk
/// by the provisioning scripts. Records are never edited in place; deletion
/// removes the file.
///
/// The scripts write camelCase JSON with the legacy `environmentName` and
/// `aksCluster` field names, bridged here with serde aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentRecord {
    #[serde(alias = "environmentName")]
    pub name: String,
    pub resource_group: String,
    #[serde(alias = "aksCluster")]
    pub cluster: String,
    pub namespace: String,
    pub container_registry: String,
    pub region: String,
    pub node_count: u32,
    pub node_size: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kube_context: Option<String>,
}

/// Reconciled status of an environment, derived from Azure queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvStatus {
    Running,
    Stopped,
    Starting,
    Unknown,
    /// Raw resource-group provisioning state passed through unchanged when it
    /// is anything other than `Succeeded` (e.g. `Failed`, `Updating`).
    Provisioning(String),
}

impl EnvStatus {
    pub fn as_str(&self) -> &str {
        match self {
            EnvStatus::Running => "Running",
            EnvStatus::Stopped => "Stopped",
            EnvStatus::Starting => "Starting",
            EnvStatus::Unknown => "Unknown",
            EnvStatus::Provisioning(state) => state,
        }
    }
}

impl fmt::Display for EnvStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EnvStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An `EnvironmentRecord` merged with its reconciled status. Built fresh for
/// every read request and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentView {
    #[serde(flatten)]
    pub record: EnvironmentRecord,
    pub status: EnvStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parses_script_written_json() {
        let json = r#"{
            "environmentName": "demo",
            "resourceGroup": "rg-sandbox-demo",
            "aksCluster": "aks-sandbox-demo",
            "namespace": "sandbox-demo",
            "containerRegistry": "acrsandboxdemo",
            "region": "eastus",
            "nodeCount": 2,
            "nodeSize": "Standard_B2s",
            "createdAt": "2024-06-01T12:00:00Z",
            "kubeContext": "aks-sandbox-demo"
        }"#;

        let record: EnvironmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "demo");
        assert_eq!(record.cluster, "aks-sandbox-demo");
        assert_eq!(record.node_count, 2);
        assert!(record.tags.is_none());
        assert_eq!(record.kube_context.as_deref(), Some("aks-sandbox-demo"));
    }

    #[test]
    fn test_status_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_value(EnvStatus::Running).unwrap(),
            serde_json::json!("Running")
        );
        assert_eq!(
            serde_json::to_value(EnvStatus::Provisioning("Updating".to_string())).unwrap(),
            serde_json::json!("Updating")
        );
    }

    #[test]
    fn test_view_flattens_record_fields() {
        let record: EnvironmentRecord = serde_json::from_str(
            r#"{
                "name": "demo",
                "resourceGroup": "rg-sandbox-demo",
                "cluster": "aks-sandbox-demo",
                "namespace": "sandbox-demo",
                "containerRegistry": "acrsandboxdemo",
                "region": "eastus",
                "nodeCount": 2,
                "nodeSize": "Standard_B2s",
                "createdAt": "2024-06-01T12:00:00Z"
            }"#,
        )
        .unwrap();

        let view = EnvironmentView {
            record,
            status: EnvStatus::Unknown,
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["name"], "demo");
        assert_eq!(value["status"], "Unknown");
        assert_eq!(value["nodeCount"], 2);
    }
}
