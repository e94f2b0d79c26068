//! Motion alert with home-presence muting
//!
//! A camera motion event is muted when any configured home MAC was seen in
//! the last few minutes, either as a network client or in a scanning log.
//! Otherwise a snapshot is requested and sent with the alert.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use dashops_domain::constants::HOME_PRESENCE_WINDOW_MINUTES;
use dashops_domain::Result;
use tracing::{info, instrument, warn};

use super::ports::ScanLogReader;
use crate::dashboard_ports::DashboardApi;
use crate::media_ports::SnapshotDownloader;
use crate::notify_ports::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuteSource {
    NetworkClients,
    ScanningLog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionOutcome {
    Muted(MuteSource),
    /// Alert sent; `snapshot` tells whether the image was attached.
    Alerted { message: String, snapshot: bool },
}

/// `**N person|people** seen by MV camera _name_`
pub fn motion_message(count: u32, camera_name: &str) -> String {
    let noun = if count == 1 { "person" } else { "people" };
    format!("**{count} {noun}** seen by MV camera _{camera_name}_")
}

pub struct MotionAlert {
    api: Arc<dyn DashboardApi>,
    notifier: Arc<dyn Notifier>,
    downloader: Arc<dyn SnapshotDownloader>,
    scan_logs: Arc<dyn ScanLogReader>,
    home_macs: HashSet<String>,
    window: Duration,
}

impl MotionAlert {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        notifier: Arc<dyn Notifier>,
        downloader: Arc<dyn SnapshotDownloader>,
        scan_logs: Arc<dyn ScanLogReader>,
        home_macs: impl IntoIterator<Item = String>,
    ) -> Self {
        let minutes = u64::try_from(HOME_PRESENCE_WINDOW_MINUTES).unwrap_or(5);
        Self {
            api,
            notifier,
            downloader,
            scan_logs,
            home_macs: home_macs.into_iter().map(|m| m.trim().to_lowercase()).collect(),
            window: Duration::from_secs(minutes * 60),
        }
    }

    #[instrument(skip(self))]
    pub async fn run(
        &self,
        count: u32,
        net_id: &str,
        camera_serial: &str,
        camera_name: &str,
    ) -> Result<MotionOutcome> {
        if let Some(source) = self.home_presence(net_id).await? {
            info!(?source, "motion alert muted, home devices present");
            return Ok(MotionOutcome::Muted(source));
        }

        let mut message = motion_message(count, camera_name);
        let link = match self.api.take_snapshot(net_id, camera_serial, None).await {
            Ok(link) => link,
            Err(err) => {
                warn!(error = %err, "snapshot request failed");
                message.push_str(" (snapshot unsuccessfully requested)");
                self.notifier.post_message(&message).await?;
                return Ok(MotionOutcome::Alerted { message, snapshot: false });
            }
        };

        match self.downloader.download(&link.url, camera_name).await {
            Some(path) => {
                self.notifier.send_file(&message, &path, "image/jpg").await?;
                Ok(MotionOutcome::Alerted { message, snapshot: true })
            }
            None => {
                message.push_str(" (snapshot unsuccessfully retrieved)");
                self.notifier.post_message(&message).await?;
                Ok(MotionOutcome::Alerted { message, snapshot: false })
            }
        }
    }

    async fn home_presence(&self, net_id: &str) -> Result<Option<MuteSource>> {
        if self.home_macs.is_empty() {
            return Ok(None);
        }

        let since = Utc::now() - chrono::Duration::minutes(HOME_PRESENCE_WINDOW_MINUTES);
        let t0 = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let clients = self.api.get_network_clients(net_id, &t0).await?;
        if clients.iter().any(|c| self.home_macs.contains(&c.mac.to_lowercase())) {
            return Ok(Some(MuteSource::NetworkClients));
        }

        let scanned = self.scan_logs.recent_client_macs(self.window).await?;
        if scanned.iter().any(|mac| self.home_macs.contains(mac)) {
            return Ok(Some(MuteSource::ScanningLog));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_pluralizes_people() {
        assert_eq!(motion_message(1, "Door"), "**1 person** seen by MV camera _Door_");
        assert_eq!(motion_message(3, "Door"), "**3 people** seen by MV camera _Door_");
    }
}
