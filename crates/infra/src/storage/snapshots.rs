use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use dashops_common::{poll_until, PollPolicy, PollStep};
use dashops_core::SnapshotDownloader;
use dashops_domain::constants::{SNAPSHOT_DOWNLOAD_ATTEMPTS, SNAPSHOT_DOWNLOAD_INTERVAL_SECS};
use dashops_domain::Result;
use reqwest::Method;
use tracing::{debug, info, warn};

use super::io_error;
use crate::http::HttpClient;

/// Fetches camera snapshots, which answer 404 until the camera has uploaded
/// the image.
#[derive(Clone)]
pub struct HttpSnapshotDownloader {
    http: HttpClient,
    dir: PathBuf,
    policy: PollPolicy,
}

impl HttpSnapshotDownloader {
    pub fn new(http: HttpClient, dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            dir: dir.into(),
            policy: PollPolicy::fixed(
                SNAPSHOT_DOWNLOAD_ATTEMPTS,
                Duration::from_secs(SNAPSHOT_DOWNLOAD_INTERVAL_SECS),
            ),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn save(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(io_error)?;
        tokio::fs::write(path, bytes).await.map_err(io_error)
    }

    fn target(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.jpg", file_stem(name)))
    }

    async fn fetch(&self, url: &str) -> Result<PollStep<Vec<u8>>> {
        let response = match self.http.send(self.http.request(Method::GET, url)).await {
            Ok(response) => response,
            Err(err) => {
                debug!(error = %err, "snapshot not reachable yet");
                return Ok(PollStep::Pending);
            }
        };
        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "snapshot not available yet");
            return Ok(PollStep::Pending);
        }
        match response.bytes().await {
            Ok(bytes) => Ok(PollStep::Ready(bytes.to_vec())),
            Err(err) => {
                debug!(error = %err, "snapshot body interrupted");
                Ok(PollStep::Pending)
            }
        }
    }
}

/// Camera names become file names; path separators and the like are replaced.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | ' ' | '.') { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('.').trim();
    if stem.is_empty() {
        "snapshot".to_string()
    } else {
        stem.to_string()
    }
}

#[async_trait]
impl SnapshotDownloader for HttpSnapshotDownloader {
    async fn download(&self, url: &str, name: &str) -> Option<PathBuf> {
        let bytes = match poll_until(&self.policy, |_| self.fetch(url)).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(name, error = %err, "snapshot could not be retrieved");
                return None;
            }
        };

        let path = self.target(name);
        let written = self.save(&path, &bytes).await;

        match written {
            Ok(()) => {
                info!(name, path = %path.display(), bytes = bytes.len(), "snapshot saved");
                Some(path)
            }
            Err(err) => {
                warn!(name, error = %err, "snapshot could not be saved");
                None
            }
        }
    }
}
