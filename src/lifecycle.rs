use crate::models::config::ProvisionerConfig;
use crate::models::environment::EnvStatus;
use crate::naming::sanitize;
use crate::provisioner::{ProvisionScript, Provisioner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Body of a creation request. Only the name is required; the optional
/// parameters are passed through to the create script verbatim when present,
/// with defaulting left entirely to the script.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRequest {
    pub name: String,
    pub region: Option<String>,
    pub node_count: Option<u32>,
    pub node_size: Option<String>,
    pub tags: Option<String>,
}

/// Structured result of a create or delete run. Either success with the
/// script's stdout, or failure with its error text; no partial-success state
/// is modeled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionOutcome {
    pub success: bool,
    pub name: String,
    pub message: String,
    pub raw_output: String,
}

/// Result of the deep check script, always produced. Any failure collapses
/// into `Unknown` plus the error text rather than an error response.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCheck {
    pub name: String,
    pub status: EnvStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Orchestrates create/delete/check requests: sanitizes names, invokes the
/// provisioning scripts, and shapes their raw output into structured
/// outcomes. Writes nothing itself; the scripts own the metadata files.
pub struct LifecycleCoordinator {
    provisioner: Arc<dyn Provisioner>,
    config: ProvisionerConfig,
}

impl LifecycleCoordinator {
    pub fn new(provisioner: Arc<dyn Provisioner>, config: ProvisionerConfig) -> Self {
        Self {
            provisioner,
            config,
        }
    }

    pub async fn create(&self, request: &CreateRequest) -> ProvisionOutcome {
        let name = sanitize(&request.name);

        let mut args = vec!["--name".to_string(), name.clone()];
        if let Some(region) = &request.region {
            args.extend(["--region".to_string(), region.clone()]);
        }
        if let Some(node_count) = request.node_count {
            args.extend(["--node-count".to_string(), node_count.to_string()]);
        }
        if let Some(node_size) = &request.node_size {
            args.extend(["--node-size".to_string(), node_size.clone()]);
        }
        if let Some(tags) = &request.tags {
            args.extend(["--tags".to_string(), tags.clone()]);
        }

        self.run(
            ProvisionScript::Create,
            args,
            self.config.create_timeout,
            &name,
            format!("Environment {name} created successfully"),
        )
        .await
    }

    pub async fn delete(&self, name: &str, force: bool) -> ProvisionOutcome {
        let name = sanitize(name);

        let mut args = vec!["--name".to_string(), name.clone()];
        if force {
            args.push("--force".to_string());
        }

        self.run(
            ProvisionScript::Delete,
            args,
            self.config.delete_timeout,
            &name,
            format!("Environment {name} deletion initiated"),
        )
        .await
    }

    /// Best-effort deep check. Never fails the caller: any script problem
    /// degrades to `Unknown` with the error text attached.
    pub async fn check(&self, name: &str) -> StatusCheck {
        let name = sanitize(name);
        let args = vec!["--name".to_string(), name.clone()];

        match self
            .provisioner
            .invoke(ProvisionScript::Check, &args, self.config.check_timeout)
            .await
        {
            Ok(output) if output.success() => StatusCheck {
                name,
                status: EnvStatus::Running,
                details: Some(output.stdout),
                error: None,
            },
            Ok(output) => StatusCheck {
                name,
                status: EnvStatus::Unknown,
                details: None,
                error: Some(error_text(&output.stdout, &output.stderr)),
            },
            Err(e) => StatusCheck {
                name,
                status: EnvStatus::Unknown,
                details: None,
                error: Some(format!("{e:#}")),
            },
        }
    }

    async fn run(
        &self,
        script: ProvisionScript,
        args: Vec<String>,
        timeout: Duration,
        name: &str,
        success_message: String,
    ) -> ProvisionOutcome {
        info!("🚀 Running {} for environment {name}", script.file_name());

        match self.provisioner.invoke(script, &args, timeout).await {
            Ok(output) if output.success() => {
                // Stderr on a clean exit is advisory only.
                if !output.stderr.trim().is_empty() {
                    warn!(
                        "⚠️  {} warnings for {name}: {}",
                        script.file_name(),
                        output.stderr.trim()
                    );
                }
                info!("✅ {} finished for environment {name}", script.file_name());
                ProvisionOutcome {
                    success: true,
                    name: name.to_string(),
                    message: success_message,
                    raw_output: output.stdout,
                }
            }
            Ok(output) => {
                let text = error_text(&output.stdout, &output.stderr);
                error!(
                    "❌ {} failed for {name} with exit code {}: {text}",
                    script.file_name(),
                    output.exit_code
                );
                ProvisionOutcome {
                    success: false,
                    name: name.to_string(),
                    message: format!("{} failed: {text}", script.file_name()),
                    raw_output: output.stdout,
                }
            }
            Err(e) => {
                error!("❌ {} failed for {name}: {e:#}", script.file_name());
                ProvisionOutcome {
                    success: false,
                    name: name.to_string(),
                    message: format!("{} failed: {e:#}", script.file_name()),
                    raw_output: String::new(),
                }
            }
        }
    }
}

fn error_text(stdout: &str, stderr: &str) -> String {
    if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provisioner::ScriptOutput;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeProvisioner {
        /// Outcome for the next invocation; `None` simulates a timeout.
        output: Option<ScriptOutput>,
        calls: Mutex<Vec<(ProvisionScript, Vec<String>)>>,
    }

    impl FakeProvisioner {
        fn succeeding(stdout: &str, stderr: &str) -> Self {
            Self::with_exit(stdout, stderr, 0)
        }

        fn with_exit(stdout: &str, stderr: &str, exit_code: i32) -> Self {
            Self {
                output: Some(ScriptOutput {
                    stdout: stdout.to_string(),
                    stderr: stderr.to_string(),
                    exit_code,
                }),
                calls: Mutex::new(vec![]),
            }
        }

        fn timing_out() -> Self {
            Self {
                output: None,
                calls: Mutex::new(vec![]),
            }
        }

        fn last_call(&self) -> (ProvisionScript, Vec<String>) {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Provisioner for FakeProvisioner {
        async fn invoke(
            &self,
            script: ProvisionScript,
            args: &[String],
            _timeout: Duration,
        ) -> Result<ScriptOutput> {
            self.calls.lock().unwrap().push((script, args.to_vec()));
            self.output
                .clone()
                .ok_or_else(|| anyhow!("create_env.sh timed out after 1800s"))
        }
    }

    fn coordinator(provisioner: Arc<FakeProvisioner>) -> LifecycleCoordinator {
        LifecycleCoordinator::new(provisioner, ProvisionerConfig::default())
    }

    #[tokio::test]
    async fn test_create_passes_optional_flags_when_present() {
        let fake = Arc::new(FakeProvisioner::succeeding("done", ""));
        let outcome = coordinator(fake.clone())
            .create(&CreateRequest {
                name: "Demo Env".to_string(),
                region: Some("eastus".to_string()),
                node_count: Some(3),
                node_size: None,
                tags: Some("team=qa".to_string()),
            })
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.name, "demo-env");
        assert_eq!(outcome.raw_output, "done");

        let (script, args) = fake.last_call();
        assert_eq!(script, ProvisionScript::Create);
        assert_eq!(
            args,
            vec![
                "--name",
                "demo-env",
                "--region",
                "eastus",
                "--node-count",
                "3",
                "--tags",
                "team=qa"
            ]
        );
    }

    #[tokio::test]
    async fn test_create_omits_absent_options() {
        let fake = Arc::new(FakeProvisioner::succeeding("", ""));
        coordinator(fake.clone())
            .create(&CreateRequest {
                name: "demo".to_string(),
                ..CreateRequest::default()
            })
            .await;

        let (_, args) = fake.last_call();
        assert_eq!(args, vec!["--name", "demo"]);
    }

    #[tokio::test]
    async fn test_create_stderr_on_success_is_advisory() {
        let fake = Arc::new(FakeProvisioner::succeeding("ok", "WARNING: quota low"));
        let outcome = coordinator(fake)
            .create(&CreateRequest {
                name: "demo".to_string(),
                ..CreateRequest::default()
            })
            .await;

        assert!(outcome.success);
        assert_eq!(outcome.raw_output, "ok");
    }

    #[tokio::test]
    async fn test_create_nonzero_exit_surfaces_error_text() {
        let fake = Arc::new(FakeProvisioner::with_exit("partial", "quota exceeded", 1));
        let outcome = coordinator(fake)
            .create(&CreateRequest {
                name: "demo".to_string(),
                ..CreateRequest::default()
            })
            .await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("quota exceeded"));
        assert_eq!(outcome.raw_output, "partial");
    }

    #[tokio::test]
    async fn test_create_timeout_is_failure() {
        let fake = Arc::new(FakeProvisioner::timing_out());
        let outcome = coordinator(fake)
            .create(&CreateRequest {
                name: "demo".to_string(),
                ..CreateRequest::default()
            })
            .await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_delete_sanitizes_and_appends_force() {
        let fake = Arc::new(FakeProvisioner::succeeding("gone", ""));
        let outcome = coordinator(fake.clone()).delete("Demo Env", true).await;

        assert!(outcome.success);
        assert_eq!(outcome.name, "demo-env");

        let (script, args) = fake.last_call();
        assert_eq!(script, ProvisionScript::Delete);
        assert_eq!(args, vec!["--name", "demo-env", "--force"]);
    }

    #[tokio::test]
    async fn test_delete_without_force() {
        let fake = Arc::new(FakeProvisioner::succeeding("gone", ""));
        coordinator(fake.clone()).delete("demo", false).await;

        let (_, args) = fake.last_call();
        assert_eq!(args, vec!["--name", "demo"]);
    }

    #[tokio::test]
    async fn test_check_success_reports_details() {
        let fake = Arc::new(FakeProvisioner::succeeding("all pods ready", ""));
        let check = coordinator(fake).check("demo").await;

        assert_eq!(check.status, EnvStatus::Running);
        assert_eq!(check.details.as_deref(), Some("all pods ready"));
        assert!(check.error.is_none());
    }

    #[tokio::test]
    async fn test_check_failure_degrades_to_unknown() {
        let fake = Arc::new(FakeProvisioner::timing_out());
        let check = coordinator(fake).check("demo").await;

        assert_eq!(check.status, EnvStatus::Unknown);
        assert!(check.details.is_none());
        assert!(check.error.unwrap().contains("timed out"));
    }
}
