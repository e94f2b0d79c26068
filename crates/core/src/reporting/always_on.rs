//! Alerts for devices expected to be always online

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dashops_domain::{Device, DeviceState, DeviceStatus, Network, Result};
use tracing::{info, instrument};

use crate::dashboard_ports::DashboardApi;
use crate::notify_ports::Notifier;

/// Markdown listing watched devices that are not online, or `None` when all
/// are up.
pub fn offline_message(
    devices: &[Device],
    statuses: &[DeviceStatus],
    networks: &[Network],
    tag: Option<&str>,
) -> Option<String> {
    let online: HashSet<&str> = statuses
        .iter()
        .filter(|s| s.status == DeviceState::Online)
        .map(|s| s.serial.as_str())
        .collect();
    let network_names: HashMap<&str, &str> =
        networks.iter().map(|n| (n.id.as_str(), n.name.as_str())).collect();

    let down: Vec<&Device> = devices
        .iter()
        .filter(|d| tag.map_or(true, |t| d.has_tag(t)))
        .filter(|d| !online.contains(d.serial.as_str()))
        .collect();
    if down.is_empty() {
        return None;
    }

    let plural = if down.len() > 1 { "devices are" } else { "device is" };
    let mut message = format!("**{} {plural} ❌ offline**: ", down.len());
    for device in down {
        let network = device
            .network_id
            .as_deref()
            .and_then(|id| network_names.get(id).copied())
            .unwrap_or("unknown network");
        message.push_str(&format!(
            "  \n- _{network}_: **{}** - {}",
            device.display_name(),
            device.model
        ));
    }
    Some(message)
}

/// Checks tagged devices and reports the ones that are down.
pub struct AlwaysOnChecker {
    api: Arc<dyn DashboardApi>,
    notifier: Arc<dyn Notifier>,
    tag: Option<String>,
}

impl AlwaysOnChecker {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Arc<dyn Notifier>, tag: Option<String>) -> Self {
        Self { api, notifier, tag }
    }

    /// Returns the message sent, if any device was down.
    #[instrument(skip(self))]
    pub async fn run(&self, org_id: &str) -> Result<Option<String>> {
        let devices = self.api.get_org_devices(org_id).await?;
        let statuses = self.api.get_device_statuses(org_id).await?;
        let networks = self.api.get_networks(org_id).await?;

        let message = offline_message(&devices, &statuses, &networks, self.tag.as_deref());
        match &message {
            Some(message) => self.notifier.post_message(message).await?,
            None => info!("all watched devices online"),
        }
        Ok(message)
    }
}
