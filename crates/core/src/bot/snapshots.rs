//! Camera snapshots on request
//!
//! Posts `[camera name](video link)` with the snapshot image URL attached
//! for each matching MV camera of a network.

use std::sync::Arc;
use std::time::Duration;

use dashops_domain::constants::SNAPSHOT_UPLOAD_WAIT_SECS;
use dashops_domain::{DashOpsError, Device, Result};
use tracing::{info, instrument, warn};

use crate::dashboard_ports::DashboardApi;
use crate::notify_ports::Notifier;

const ALL_KEYWORDS: [&str; 5] = ["all", "complete", "entire", "every", "full"];
const NO_ACCESS_MESSAGE: &str =
    "Does your API key have write access to the specified network ID with cameras? 😳";

/// Whether a chat request asks for every camera.
pub fn wants_all_cameras(message: &str) -> bool {
    let message = message.to_lowercase();
    message.split_whitespace().any(|word| ALL_KEYWORDS.contains(&word))
}

/// Cameras matching any filter by name or tag; all cameras without filters.
pub fn select_cameras<'a>(devices: &'a [Device], filters: &[String]) -> Vec<&'a Device> {
    devices
        .iter()
        .filter(|d| d.is_camera())
        .filter(|d| {
            filters.is_empty()
                || filters.iter().any(|f| f == d.display_name() || d.has_tag(f))
        })
        .collect()
}

/// One retrieved snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSnapshot {
    pub name: String,
    pub snapshot_url: String,
    pub video_url: String,
}

pub struct SnapshotBot {
    api: Arc<dyn DashboardApi>,
    notifier: Arc<dyn Notifier>,
    upload_wait: Duration,
}

impl SnapshotBot {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier, upload_wait: Duration::from_secs(SNAPSHOT_UPLOAD_WAIT_SECS) }
    }

    /// Delay between requesting snapshots and posting their URLs.
    pub fn with_upload_wait(mut self, wait: Duration) -> Self {
        self.upload_wait = wait;
        self
    }

    /// Retrieve and post snapshots. API failures become a chat message and
    /// the number of posted snapshots is returned.
    #[instrument(skip(self, filters))]
    pub async fn send_snapshots(
        &self,
        net_id: &str,
        timestamp: Option<&str>,
        filters: &[String],
        all: bool,
    ) -> Result<usize> {
        let intro = if all {
            "📸 _Retrieving all cameras' snapshots..._"
        } else {
            "📷 _Retrieving camera snapshots..._"
        };
        self.notifier.post_message(intro).await?;

        let filters: &[String] = if all { &[] } else { filters };
        let snapshots = match self.collect(net_id, timestamp, filters).await {
            Ok(snapshots) => snapshots,
            Err(err @ DashOpsError::Api { .. }) => {
                warn!(error = %err, "snapshot retrieval failed");
                self.notifier.post_message(NO_ACCESS_MESSAGE).await?;
                return Ok(0);
            }
            Err(err) => return Err(err),
        };

        if !snapshots.is_empty() && !self.upload_wait.is_zero() {
            tokio::time::sleep(self.upload_wait).await;
        }
        for snapshot in &snapshots {
            self.notifier
                .post_file_url(&format!("[{}]({})", snapshot.name, snapshot.video_url), &snapshot.snapshot_url)
                .await?;
        }
        info!(count = snapshots.len(), "snapshots posted");
        Ok(snapshots.len())
    }

    async fn collect(
        &self,
        net_id: &str,
        timestamp: Option<&str>,
        filters: &[String],
    ) -> Result<Vec<CameraSnapshot>> {
        let devices = self.api.get_network_devices(net_id).await?;
        let mut snapshots = Vec::new();
        for camera in select_cameras(&devices, filters) {
            let video = self.api.get_video_link(net_id, &camera.serial, timestamp).await?;
            match self.api.take_snapshot(net_id, &camera.serial, timestamp).await {
                Ok(link) => snapshots.push(CameraSnapshot {
                    name: camera.display_name().to_string(),
                    snapshot_url: link.url,
                    video_url: video.url,
                }),
                // Offline cameras cannot produce a snapshot
                Err(DashOpsError::Api { status, .. }) => {
                    warn!(serial = %camera.serial, status, "no snapshot for camera");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(snapshots)
    }
}
