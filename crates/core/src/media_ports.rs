//! Port interface for retrieving camera snapshot images

use std::path::PathBuf;

use async_trait::async_trait;

/// Downloads a snapshot URL to a local file.
#[async_trait]
pub trait SnapshotDownloader: Send + Sync {
    /// Fetches `url` into `{name}.jpg`, retrying while the image is not yet
    /// available.
    ///
    /// Returns `None` once the retry budget is spent; the caller decides how
    /// to report it.
    async fn download(&self, url: &str, name: &str) -> Option<PathBuf>;
}
