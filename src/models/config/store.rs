use serde::Deserialize;
use std::path::PathBuf;

/// Location of the on-disk environment metadata files.
///
/// This section is loaded from `[store]` in `config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory scanned for `.env-*.json` metadata files.
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}
