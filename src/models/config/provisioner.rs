use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the external provisioning scripts.
///
/// This section is loaded from `[provisioner]` in `config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvisionerConfig {
    /// Directory holding create_env.sh, delete_env.sh and check_env.sh.
    pub scripts_dir: PathBuf,
    /// Upper bound on a create invocation. Real provisioning is slow.
    #[serde(with = "humantime_serde")]
    pub create_timeout: Duration,
    /// Upper bound on a delete invocation.
    #[serde(with = "humantime_serde")]
    pub delete_timeout: Duration,
    /// Upper bound on a deep status check.
    #[serde(with = "humantime_serde")]
    pub check_timeout: Duration,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            scripts_dir: PathBuf::from("scripts"),
            create_timeout: Duration::from_secs(30 * 60),
            delete_timeout: Duration::from_secs(10 * 60),
            check_timeout: Duration::from_secs(60),
        }
    }
}
