use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use dashops_core::ScanLogReader;
use dashops_domain::constants::{SCANNING_LOG_RETENTION, SCANNING_LOG_TIME_FORMAT};
use dashops_domain::{DashOpsError, Result, ScanKind, ScanningPayload};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::io_error;
use crate::errors::InfraError;

const MAX_SAME_SECOND: u32 = 1000;

/// Directory of received scanning payloads, one file per POST, named
/// `{local time}_{Bluetooth|WiFi}.json`. A second payload of the same radio
/// within one second gets a `_{n}` suffix.
#[derive(Debug, Clone)]
pub struct FileScanLogs {
    dir: PathBuf,
    retention: usize,
}

impl FileScanLogs {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), retention: SCANNING_LOG_RETENTION }
    }

    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store one payload and prune the directory down to the newest files.
    ///
    /// # Errors
    /// Filesystem or encoding failures.
    pub async fn write(&self, kind: ScanKind, payload: &Value) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_error)?;
        let stamp = Local::now().format(SCANNING_LOG_TIME_FORMAT).to_string();
        let json = serde_json::to_vec_pretty(payload).map_err(|err| DashOpsError::from(InfraError::from(err)))?;
        let path = self.write_new(&stamp, kind, &json).await?;
        debug!(path = %path.display(), "scanning payload stored");

        self.prune().await?;
        Ok(path)
    }

    async fn write_new(&self, stamp: &str, kind: ScanKind, json: &[u8]) -> Result<PathBuf> {
        for seq in 0..=MAX_SAME_SECOND {
            let name = if seq == 0 {
                format!("{stamp}_{}.json", kind.label())
            } else {
                format!("{stamp}_{}_{seq}.json", kind.label())
            };
            let path = self.dir.join(name);
            let opened = tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await;
            let mut file = match opened {
                Ok(file) => file,
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(io_error(err)),
            };
            file.write_all(json).await.map_err(io_error)?;
            file.flush().await.map_err(io_error)?;
            return Ok(path);
        }
        Err(DashOpsError::Internal(format!("more than {MAX_SAME_SECOND} scanning logs stamped {stamp}")))
    }

    /// Log files sorted oldest first, by timestamp then sequence.
    async fn log_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(err)),
        };
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(key) = log_key(&name) {
                files.push((key, name, entry.path()));
            }
        }
        files.sort();
        Ok(files.into_iter().map(|(_, name, path)| (name, path)).collect())
    }

    async fn prune(&self) -> Result<()> {
        let files = self.log_files().await?;
        let excess = files.len().saturating_sub(self.retention);
        for (_, path) in files.into_iter().take(excess) {
            tokio::fs::remove_file(&path).await.map_err(io_error)?;
        }
        if excess > 0 {
            debug!(removed = excess, "old scanning logs pruned");
        }
        Ok(())
    }
}

fn log_timestamp(file_name: &str) -> Option<NaiveDateTime> {
    log_key(file_name).map(|(written, _)| written)
}

/// `(timestamp, same-second sequence)` parsed from a log file name.
fn log_key(file_name: &str) -> Option<(NaiveDateTime, u32)> {
    let stem = file_name.strip_suffix(".json")?;
    let (rest, last) = stem.rsplit_once('_')?;
    let (stamp, kind, seq) = match last.parse::<u32>() {
        Ok(seq) => {
            let (stamp, kind) = rest.rsplit_once('_')?;
            (stamp, kind, seq)
        }
        Err(_) => (rest, last, 0),
    };
    if kind != ScanKind::Bluetooth.label() && kind != ScanKind::WiFi.label() {
        return None;
    }
    let written = NaiveDateTime::parse_from_str(stamp, SCANNING_LOG_TIME_FORMAT).ok()?;
    Some((written, seq))
}

#[async_trait]
impl ScanLogReader for FileScanLogs {
    async fn recent_client_macs(&self, window: Duration) -> Result<HashSet<String>> {
        let now = Local::now().naive_local();
        let window = chrono::Duration::from_std(window)
            .map_err(|err| DashOpsError::InvalidInput(format!("presence window: {err}")))?;

        let mut macs = HashSet::new();
        for (name, path) in self.log_files().await? {
            let Some(written) = log_timestamp(&name) else { continue };
            if now.signed_duration_since(written) > window {
                continue;
            }
            let raw = tokio::fs::read_to_string(&path).await.map_err(io_error)?;
            match serde_json::from_str::<ScanningPayload>(&raw) {
                Ok(payload) => macs.extend(payload.client_macs()),
                Err(err) => warn!(file = %name, error = %err, "unreadable scanning log skipped"),
            }
        }
        Ok(macs)
    }
}
