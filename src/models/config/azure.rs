use serde::Deserialize;
use std::time::Duration;

/// Configuration for Azure CLI status queries.
///
/// This section is loaded from `[azure]` in `config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    /// Timeout applied independently to each `az` query.
    #[serde(with = "humantime_serde")]
    pub query_timeout: Duration,
    /// Extra arguments appended to every `az` invocation (e.g. --subscription).
    pub extra_args: Vec<String>,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(30),
            extra_args: vec![],
        }
    }
}
