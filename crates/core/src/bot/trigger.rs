//! Switch port toggle, used to trigger webhook alerts on demand

use std::sync::Arc;

use dashops_domain::{Result, SwitchPortUpdate};
use tracing::{info, instrument, warn};

use crate::dashboard_ports::DashboardApi;
use crate::notify_ports::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortOutcome {
    AlreadySet,
    Changed,
    /// The update was accepted but the port reports the old state.
    Mismatch,
}

/// Enables or disables one switch port and reports the result to chat.
pub struct PortTrigger {
    api: Arc<dyn DashboardApi>,
    notifier: Arc<dyn Notifier>,
}

impl PortTrigger {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    #[instrument(skip(self))]
    pub async fn set_port(&self, serial: &str, port: u32, enabled: bool) -> Result<PortOutcome> {
        let word = if enabled { "enabled" } else { "disabled" };

        let current = self.api.get_switch_port(serial, port).await?;
        if current.enabled == enabled {
            self.notifier.post_message(&format!("Port already {word}!")).await?;
            return Ok(PortOutcome::AlreadySet);
        }

        let updated =
            self.api.update_switch_port(serial, port, &SwitchPortUpdate::enabled(enabled)).await?;
        if updated.enabled == enabled {
            let verb = if enabled { "Enabled" } else { "Disabled" };
            self.notifier.post_message(&format!("{verb} your switchport!")).await?;
            info!(serial, port, enabled, "switch port updated");
            Ok(PortOutcome::Changed)
        } else {
            self.notifier.post_message("Something went wrong!").await?;
            warn!(serial, port, enabled, "switch port did not take the new state");
            Ok(PortOutcome::Mismatch)
        }
    }
}
