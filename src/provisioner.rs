use crate::models::config::ProvisionerConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// The three provisioning scripts this service drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionScript {
    Create,
    Delete,
    Check,
}

impl ProvisionScript {
    pub fn file_name(&self) -> &'static str {
        match self {
            ProvisionScript::Create => "create_env.sh",
            ProvisionScript::Delete => "delete_env.sh",
            ProvisionScript::Check => "check_env.sh",
        }
    }
}

/// Raw result of a completed script run. A non-zero exit code is data here;
/// the lifecycle coordinator decides what it means.
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ScriptOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// External provisioner seam. `Err` covers spawn failures and timeouts; a
/// process that ran to completion always comes back as `Ok`, whatever its
/// exit code. Tests substitute fakes instead of shelling out.
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn invoke(
        &self,
        script: ProvisionScript,
        args: &[String],
        timeout: Duration,
    ) -> Result<ScriptOutput>;
}

/// Runs the provisioning shell scripts as subprocesses.
pub struct ScriptProvisioner {
    scripts_dir: PathBuf,
}

impl ScriptProvisioner {
    pub fn new(config: &ProvisionerConfig) -> Self {
        Self {
            scripts_dir: config.scripts_dir.clone(),
        }
    }
}

#[async_trait]
impl Provisioner for ScriptProvisioner {
    async fn invoke(
        &self,
        script: ProvisionScript,
        args: &[String],
        timeout: Duration,
    ) -> Result<ScriptOutput> {
        let script_path = self.scripts_dir.join(script.file_name());
        debug!(
            "🚀 Executing: bash {} {}",
            script_path.display(),
            args.join(" ")
        );

        let output = tokio::time::timeout(
            timeout,
            Command::new("bash").arg(&script_path).args(args).output(),
        )
        .await
        .with_context(|| format!("{} timed out after {timeout:?}", script.file_name()))?
        .with_context(|| format!("failed to execute {}", script.file_name()))?;

        Ok(ScriptOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
