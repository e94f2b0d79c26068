use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashops_core::StateStore;
use dashops_domain::{DashOpsError, DemoState, Result};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::io_error;
use crate::errors::InfraError;

/// Demo state kept as one pretty-printed JSON file, replaced atomically.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> Result<Option<DemoState>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(err)),
        };
        let state = serde_json::from_str(&raw).map_err(|err| DashOpsError::from(InfraError::from(err)))?;
        Ok(Some(state))
    }

    async fn save(&self, state: &DemoState) -> Result<()> {
        let json = serde_json::to_vec_pretty(state).map_err(|err| DashOpsError::from(InfraError::from(err)))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        // temp file + fsync + rename so a crash never leaves half a state file
        let temp = self.temp_path();
        let mut file = tokio::fs::File::create(&temp).await.map_err(io_error)?;
        file.write_all(&json).await.map_err(io_error)?;
        file.sync_all().await.map_err(io_error)?;
        drop(file);
        tokio::fs::rename(&temp, &self.path).await.map_err(io_error)?;

        debug!(path = %self.path.display(), networks = state.networks.len(), "demo state saved");
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(err)),
        }
    }
}
