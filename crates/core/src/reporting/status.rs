//! Org-wide device status report

use std::sync::Arc;

use dashops_domain::constants::{
    STATUS_LATENCY_THRESHOLD_MS, STATUS_LIST_LIMIT, STATUS_LOSS_THRESHOLD, VENDOR_ORG_ID,
};
use dashops_domain::{DashOpsError, DeviceState, DeviceStatus, Result, UplinkLossLatency};
use tracing::{debug, info, instrument};

use crate::dashboard_ports::DashboardApi;
use crate::notify_ports::Notifier;

const NO_ACCESS_MESSAGE: &str =
    "Does your API key have access to at least a single org with API enabled? 😫";

/// Devices grouped by reported state.
#[derive(Debug, Default)]
pub struct StatusTally<'a> {
    pub online: Vec<&'a DeviceStatus>,
    pub alerting: Vec<&'a DeviceStatus>,
    pub offline: Vec<&'a DeviceStatus>,
    pub total: usize,
}

impl<'a> StatusTally<'a> {
    pub fn from_statuses(statuses: &'a [DeviceStatus]) -> Self {
        let mut tally = Self { total: statuses.len(), ..Self::default() };
        for status in statuses {
            match status.status {
                DeviceState::Online => tally.online.push(status),
                DeviceState::Alerting => tally.alerting.push(status),
                DeviceState::Offline => tally.offline.push(status),
                DeviceState::Unknown => {}
            }
        }
        tally
    }

    /// Share of all devices, in percent.
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }

    /// Markdown block for one organization.
    pub fn render(&self, org_name: &str) -> String {
        let mut message = format!("### **{org_name}**");
        let groups = [
            (&self.online, "✅", "online", ("", "")),
            (&self.alerting, "⚠️", "alerting", ("_", "_")),
            (&self.offline, "❌", "offline", ("**", "**")),
        ];
        for (devices, icon, label, (open, close)) in groups {
            if devices.is_empty() {
                continue;
            }
            let count = devices.len();
            message.push_str(&format!(
                "  \n- {icon} {open}{count} {label} ({:.1}%){close}",
                self.percent(count)
            ));
            if count <= STATUS_LIST_LIMIT {
                let names: Vec<&str> = devices.iter().map(|d| d.display_name()).collect();
                message.push_str(": ");
                message.push_str(&names.join(", "));
            }
        }
        message
    }
}

/// `> F of C appliances online (P%) using 🗼 cellular failover`, when any
/// online appliance is on cellular.
pub fn cellular_failover_line(statuses: &[DeviceStatus]) -> Option<String> {
    let cellular: Vec<&DeviceStatus> = statuses
        .iter()
        .filter(|s| s.status == DeviceState::Online && s.using_cellular_failover.is_some())
        .collect();
    let failover = cellular.iter().filter(|s| s.using_cellular_failover == Some(true)).count();
    if failover == 0 {
        return None;
    }
    Some(format!(
        "> {failover} of {} appliances online ({:.1}%) using 🗼 cellular failover",
        cellular.len(),
        failover as f64 / cellular.len() as f64 * 100.0
    ))
}

/// Probes whose mean loss is within `(loss_threshold, 100)` and whose mean
/// latency exceeds `latency_threshold`, counted separately.
///
/// 100% loss means the probe target is unreachable and is ignored.
pub fn degraded_uplinks(
    uplinks: &[UplinkLossLatency],
    loss_threshold: f64,
    latency_threshold: f64,
) -> (usize, usize) {
    let lossy = uplinks
        .iter()
        .filter_map(UplinkLossLatency::mean_loss)
        .filter(|loss| *loss > loss_threshold && *loss < 100.0)
        .count();
    let slow = uplinks
        .iter()
        .filter_map(UplinkLossLatency::mean_latency)
        .filter(|latency| *latency > latency_threshold)
        .count();
    (lossy, slow)
}

/// Posts one status report per accessible organization.
pub struct StatusReporter {
    api: Arc<dyn DashboardApi>,
    notifier: Arc<dyn Notifier>,
}

impl StatusReporter {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Returns the number of organizations that reported device statuses.
    ///
    /// Organizations answering with an API error (API access disabled) are
    /// skipped.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<usize> {
        let orgs = self.api.get_organizations().await?;
        let mut responded = 0;

        for org in orgs.iter().filter(|o| o.id != VENDOR_ORG_ID) {
            let statuses = skip_api_errors(self.api.get_device_statuses(&org.id).await)?;
            if let Some(statuses) = statuses.filter(|s| !s.is_empty()) {
                let tally = StatusTally::from_statuses(&statuses);
                self.notifier.post_message(&tally.render(&org.name)).await?;
                responded += 1;
                info!(org_id = %org.id, devices = tally.total, "status report sent");

                if let Some(line) = cellular_failover_line(&statuses) {
                    self.notifier.post_message(&line).await?;
                }
            }

            let uplinks = skip_api_errors(self.api.get_uplinks_loss_latency(&org.id).await)?;
            if let Some(uplinks) = uplinks.filter(|u| !u.is_empty()) {
                let (lossy, slow) =
                    degraded_uplinks(&uplinks, STATUS_LOSS_THRESHOLD, STATUS_LATENCY_THRESHOLD_MS);
                if lossy > 0 {
                    self.notifier
                        .post_message(&format!(
                            "{lossy} device-uplink-probes currently have 🕳 packet loss higher than **{STATUS_LOSS_THRESHOLD:.1}%**!"
                        ))
                        .await?;
                }
                if slow > 0 {
                    self.notifier
                        .post_message(&format!(
                            "{slow} device-uplink-probes currently have 🐢 latency higher than **{STATUS_LATENCY_THRESHOLD_MS:.1} ms**!"
                        ))
                        .await?;
                }
            }
        }

        if responded == 0 {
            self.notifier.post_message(NO_ACCESS_MESSAGE).await?;
        }
        Ok(responded)
    }
}

fn skip_api_errors<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DashOpsError::Api { status, .. }) => {
            debug!(status, "organization skipped");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
