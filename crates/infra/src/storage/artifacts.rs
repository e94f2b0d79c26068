use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashops_core::ArtifactStore;
use dashops_domain::constants::{
    CREATE_DEVICES_FILE, CREATE_NETWORKS_FILE, CREATE_SETTINGS_PREFIX, SNAPSHOT_FILE_PREFIX,
};
use dashops_domain::{ActionBatch, DashOpsError, Result};
use tracing::{debug, info};

use super::io_error;
use crate::errors::InfraError;

/// Batch payload copies and demo snapshots in one working directory.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Files written by the demo workflow.
fn is_demo_artifact(name: &str) -> bool {
    name == CREATE_NETWORKS_FILE
        || name == CREATE_DEVICES_FILE
        || (name.starts_with(CREATE_SETTINGS_PREFIX) && name.ends_with(".json"))
        || (name.starts_with(SNAPSHOT_FILE_PREFIX) && name.ends_with(".jpg"))
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn write_batch(&self, file_name: &str, batch: &ActionBatch) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_error)?;
        let json = serde_json::to_vec_pretty(batch).map_err(|err| DashOpsError::from(InfraError::from(err)))?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, json).await.map_err(io_error)?;
        debug!(path = %path.display(), actions = batch.actions.len(), "batch payload written");
        Ok(path)
    }

    async fn remove_all(&self) -> Result<Vec<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(err)),
        };

        let mut removed = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let name = entry.file_name();
            if !is_demo_artifact(&name.to_string_lossy()) {
                continue;
            }
            let path = entry.path();
            tokio::fs::remove_file(&path).await.map_err(io_error)?;
            removed.push(path);
        }
        removed.sort();

        info!(count = removed.len(), dir = %self.dir.display(), "demo artifacts removed");
        Ok(removed)
    }
}
