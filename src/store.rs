use crate::models::environment::EnvironmentRecord;
use crate::naming::sanitize;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

const FILE_PREFIX: &str = ".env-";
const FILE_SUFFIX: &str = ".json";

/// Repository over the directory of per-environment JSON metadata files.
///
/// The store only reads: records are written (and removed) by the
/// provisioning scripts. One file per environment, keyed by sanitized name,
/// read wholesale with no partial updates.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    root: PathBuf,
}

impl MetadataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, sanitized: &str) -> PathBuf {
        self.root.join(format!("{FILE_PREFIX}{sanitized}{FILE_SUFFIX}"))
    }

    /// Read the record for `name` (sanitized internally). `Ok(None)` when no
    /// metadata file exists; that is the caller's "not found" signal.
    pub async fn read(&self, name: &str) -> Result<Option<EnvironmentRecord>> {
        let path = self.record_path(&sanitize(name));

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading metadata file {}", path.display()));
            }
        };

        let record = serde_json::from_str(&contents)
            .with_context(|| format!("parsing metadata file {}", path.display()))?;
        Ok(Some(record))
    }

    /// Scan the root directory for `.env-*.json` files. Zero matches yields
    /// an empty Vec. Unreadable or unparsable files are logged and skipped so
    /// one bad record never hides the rest.
    pub async fn list(&self) -> Result<Vec<EnvironmentRecord>> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading metadata directory {}", self.root.display()));
            }
        };

        let mut records = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("iterating metadata directory")?
        {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if !file_name.starts_with(FILE_PREFIX) || !file_name.ends_with(FILE_SUFFIX) {
                continue;
            }

            let path = entry.path();
            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(e) => {
                    warn!("⚠️  Skipping unreadable metadata file {}: {e}", path.display());
                    continue;
                }
            };

            match serde_json::from_str::<EnvironmentRecord>(&contents) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("⚠️  Skipping invalid metadata file {}: {e}", path.display());
                }
            }
        }

        Ok(records)
    }
}
