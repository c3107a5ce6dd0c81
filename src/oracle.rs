use crate::models::config::AzureConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Best-effort cloud status queries. Every method returns a tagged outcome
/// the reconciler pattern-matches into a status value; failures here are
/// expected and never bubble past the reconciler.
#[async_trait]
pub trait StatusOracle: Send + Sync {
    /// Provisioning state of a resource group (e.g. `Succeeded`, `Failed`).
    async fn resource_group_state(&self, resource_group: &str) -> Result<String>;

    /// Power state code of a managed cluster (e.g. `Running`, `Stopped`).
    async fn cluster_power_state(&self, resource_group: &str, cluster: &str) -> Result<String>;
}

/// Queries the Azure CLI synchronously, one subprocess per question, each
/// under its own timeout.
pub struct AzureCliOracle {
    config: AzureConfig,
}

impl AzureCliOracle {
    pub fn new(config: AzureConfig) -> Self {
        Self { config }
    }

    async fn run_az(&self, args: &[&str]) -> Result<String> {
        debug!("🔍 Executing: az {}", args.join(" "));

        let mut cmd = Command::new("az");
        cmd.args(args);
        cmd.args(&self.config.extra_args);

        let output = tokio::time::timeout(self.config.query_timeout, cmd.output())
            .await
            .context("az query timed out")?
            .context("failed to execute az")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "az exited with {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl StatusOracle for AzureCliOracle {
    async fn resource_group_state(&self, resource_group: &str) -> Result<String> {
        self.run_az(&[
            "group",
            "show",
            "--name",
            resource_group,
            "--query",
            "properties.provisioningState",
            "-o",
            "tsv",
        ])
        .await
    }

    async fn cluster_power_state(&self, resource_group: &str, cluster: &str) -> Result<String> {
        self.run_az(&[
            "aks",
            "show",
            "--resource-group",
            resource_group,
            "--name",
            cluster,
            "--query",
            "powerState.code",
            "-o",
            "tsv",
        ])
        .await
    }
}
