use crate::models::environment::{EnvStatus, EnvironmentRecord, EnvironmentView};
use crate::naming::{cluster_name, resource_group_name, sanitize};
use crate::oracle::StatusOracle;
use std::sync::Arc;
use tracing::debug;

/// Merges metadata records with best-effort Azure query results into a
/// unified environment view. Read-only; oracle failures degrade to a status
/// value instead of failing the request.
pub struct StatusReconciler {
    oracle: Arc<dyn StatusOracle>,
}

impl StatusReconciler {
    pub fn new(oracle: Arc<dyn StatusOracle>) -> Self {
        Self { oracle }
    }

    /// Determine the live status for an environment name.
    ///
    /// Resource group unqueryable → `Unknown`. Provisioning state other than
    /// `Succeeded` → that raw state, passed through. `Succeeded` with an
    /// unqueryable cluster → `Starting`: a group that provisioned but has no
    /// answering cluster yet is presumed mid-startup.
    pub async fn environment_status(&self, name: &str) -> EnvStatus {
        let sanitized = sanitize(name);
        let resource_group = resource_group_name(&sanitized);

        let state = match self.oracle.resource_group_state(&resource_group).await {
            Ok(state) => state,
            Err(e) => {
                debug!("🔍 Resource group {resource_group} not queryable: {e:#}");
                return EnvStatus::Unknown;
            }
        };

        if state != "Succeeded" {
            return EnvStatus::Provisioning(state);
        }

        let cluster = cluster_name(&sanitized);
        match self.oracle.cluster_power_state(&resource_group, &cluster).await {
            Ok(power) if power == "Running" => EnvStatus::Running,
            Ok(_) => EnvStatus::Stopped,
            Err(e) => {
                debug!("🔍 Cluster {cluster} not queryable yet: {e:#}");
                EnvStatus::Starting
            }
        }
    }

    /// Build the full view for a record loaded from the metadata store.
    pub async fn view(&self, record: EnvironmentRecord) -> EnvironmentView {
        let status = self.environment_status(&record.name).await;
        EnvironmentView { record, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;

    /// Oracle returning canned answers; `None` simulates a failed query.
    struct FakeOracle {
        group_state: Option<String>,
        power_state: Option<String>,
    }

    impl FakeOracle {
        fn new(group_state: Option<&str>, power_state: Option<&str>) -> Self {
            Self {
                group_state: group_state.map(String::from),
                power_state: power_state.map(String::from),
            }
        }
    }

    #[async_trait]
    impl StatusOracle for FakeOracle {
        async fn resource_group_state(&self, _resource_group: &str) -> Result<String> {
            self.group_state
                .clone()
                .ok_or_else(|| anyhow!("resource group not found"))
        }

        async fn cluster_power_state(
            &self,
            _resource_group: &str,
            _cluster: &str,
        ) -> Result<String> {
            self.power_state
                .clone()
                .ok_or_else(|| anyhow!("cluster not found"))
        }
    }

    fn reconciler(group_state: Option<&str>, power_state: Option<&str>) -> StatusReconciler {
        StatusReconciler::new(Arc::new(FakeOracle::new(group_state, power_state)))
    }

    #[tokio::test]
    async fn test_group_query_failure_is_unknown() {
        let status = reconciler(None, None).environment_status("demo").await;
        assert_eq!(status, EnvStatus::Unknown);
    }

    #[tokio::test]
    async fn test_non_succeeded_state_passes_through() {
        let status = reconciler(Some("Updating"), Some("Running"))
            .environment_status("demo")
            .await;
        assert_eq!(status, EnvStatus::Provisioning("Updating".to_string()));
    }

    #[tokio::test]
    async fn test_succeeded_and_running() {
        let status = reconciler(Some("Succeeded"), Some("Running"))
            .environment_status("demo")
            .await;
        assert_eq!(status, EnvStatus::Running);
    }

    #[tokio::test]
    async fn test_succeeded_and_other_power_state_is_stopped() {
        let status = reconciler(Some("Succeeded"), Some("Stopped"))
            .environment_status("demo")
            .await;
        assert_eq!(status, EnvStatus::Stopped);
    }

    #[tokio::test]
    async fn test_succeeded_with_failing_cluster_query_is_starting() {
        let status = reconciler(Some("Succeeded"), None)
            .environment_status("demo")
            .await;
        assert_eq!(status, EnvStatus::Starting);
    }
}
