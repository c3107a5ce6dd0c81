mod azure;
mod provisioner;
mod server;
mod store;

pub use azure::*;
pub use provisioner::*;
pub use server::*;
pub use store::*;

use anyhow::{Context, Result};
use config::Config;
use serde::Deserialize;
use std::env;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SandboxManagerConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub provisioner: ProvisionerConfig,
    pub azure: AzureConfig,
}

impl SandboxManagerConfig {
    pub fn load() -> Result<Self> {
        let config_path = env::var("SANDBOX_MANAGER_CONFIG")
            .unwrap_or_else(|_| "/var/lib/sandbox_manager/config.toml".to_string());

        debug!("SANDBOX_MANAGER_CONFIG => {}", config_path);

        let settings = Config::builder()
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("SANDBOX_MANAGER").separator("__"))
            .build()
            .context("loading configuration")?;

        settings
            .try_deserialize::<Self>()
            .context("parsing configuration")
    }
}
