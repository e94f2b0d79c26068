//! Appliance WAN performance alerts

use std::collections::HashMap;
use std::sync::Arc;

use dashops_domain::constants::PERF_SAMPLES_PER_PROBE;
use dashops_domain::{Device, Network, PerfConfig, Result, UplinkLossLatency};
use tracing::{info, instrument};

use crate::dashboard_ports::DashboardApi;
use crate::notify_ports::Notifier;

const UPLINKS: [(&str, &str); 2] = [("wan1", "WAN1"), ("wan2", "WAN2")];

/// Average loss and latency of one appliance uplink across all probes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UplinkAverage {
    pub loss: f64,
    pub latency: f64,
}

/// Sum over probes and samples, divided by probe count and samples per
/// probe. `None` when the uplink has no probes.
pub fn uplink_average(probes: &[&UplinkLossLatency]) -> Option<UplinkAverage> {
    if probes.is_empty() {
        return None;
    }
    let divisor = probes.len() as f64 * PERF_SAMPLES_PER_PROBE;
    let loss: f64 = probes.iter().map(|p| p.total_loss()).sum();
    let latency: f64 = probes.iter().map(|p| p.total_latency()).sum();
    Some(UplinkAverage { loss: loss / divisor, latency: latency / divisor })
}

/// Alert messages for every watched appliance uplink over threshold.
pub fn appliance_alerts(
    devices: &[Device],
    networks: &[Network],
    perf: &[UplinkLossLatency],
    config: &PerfConfig,
) -> Vec<String> {
    let network_names: HashMap<&str, &str> =
        networks.iter().map(|n| (n.id.as_str(), n.name.as_str())).collect();
    let watched = devices
        .iter()
        .filter(|d| d.is_appliance())
        .filter(|d| config.tag.as_deref().map_or(true, |tag| d.has_tag(tag)));

    let mut alerts = Vec::new();
    for device in watched {
        let network = device
            .network_id
            .as_deref()
            .and_then(|id| network_names.get(id).copied())
            .unwrap_or("unknown network");
        let name = device.display_name();

        for (uplink, label) in UPLINKS {
            let probes: Vec<&UplinkLossLatency> =
                perf.iter().filter(|p| p.serial == device.serial && p.uplink == uplink).collect();
            let Some(average) = uplink_average(&probes) else { continue };

            if average.loss > config.loss_threshold {
                alerts.push(format!(
                    "🕳 **{name}** ({}) in _{network}_ has packet loss of **{:.1}%** on _{label}_",
                    device.model, average.loss
                ));
            }
            if average.latency > config.latency_threshold {
                alerts.push(format!(
                    "🐢 **{name}** ({}) in _{network}_ has latency of **{:.1} ms** on _{label}_",
                    device.model, average.latency
                ));
            }
        }
    }
    alerts
}

/// Sends loss/latency alerts for appliances in one organization.
pub struct PerfChecker {
    api: Arc<dyn DashboardApi>,
    notifier: Arc<dyn Notifier>,
    config: PerfConfig,
}

impl PerfChecker {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Arc<dyn Notifier>, config: PerfConfig) -> Self {
        Self { api, notifier, config }
    }

    /// Returns the alerts that were sent.
    #[instrument(skip(self))]
    pub async fn run(&self, org_id: &str) -> Result<Vec<String>> {
        let devices = self.api.get_org_devices(org_id).await?;
        let networks = self.api.get_networks(org_id).await?;
        let perf = self.api.get_uplinks_loss_latency(org_id).await?;

        let alerts = appliance_alerts(&devices, &networks, &perf, &self.config);
        for alert in &alerts {
            self.notifier.post_message(alert).await?;
        }
        info!(alerts = alerts.len(), "performance check finished");
        Ok(alerts)
    }
}
