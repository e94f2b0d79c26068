//! Network provisioning from a submitted chat form
//!
//! The form carries a location, an optional street address and one selected
//! serial per product family (`none` when nothing is selected).

use std::collections::HashSet;
use std::sync::Arc;

use dashops_domain::constants::{DEMO_LOCATION_PREFIX, DEMO_NETWORK_TYPE};
use dashops_domain::{CreateNetworkRequest, InventoryDevice, Result, UpdateDeviceRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::dashboard_ports::DashboardApi;
use crate::notify_ports::Notifier;

/// Serials offered per product family on the input form.
const CHOICES_PER_FAMILY: usize = 7;
const NO_SELECTION: &str = "none";

/// Submitted form values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionForm {
    #[serde(rename = "myLocation", default)]
    pub location: Option<String>,
    #[serde(rename = "myAddress", default)]
    pub address: Option<String>,
    #[serde(rename = "MXSelectVal", default)]
    pub mx: Option<String>,
    #[serde(rename = "MSSelectVal", default)]
    pub ms: Option<String>,
    #[serde(rename = "MRSelectVal", default)]
    pub mr: Option<String>,
    #[serde(rename = "MVSelectVal", default)]
    pub mv: Option<String>,
}

impl ProvisionForm {
    pub fn is_empty(&self) -> bool {
        [&self.location, &self.address, &self.mx, &self.ms, &self.mr, &self.mv]
            .iter()
            .all(|field| field.as_deref().map_or(true, |v| v.trim().is_empty()))
    }

    /// Selected serials, skipping blanks and `none`.
    pub fn selected_serials(&self) -> Vec<&str> {
        [&self.mx, &self.ms, &self.mr, &self.mv]
            .into_iter()
            .filter_map(|s| s.as_deref().map(str::trim))
            .filter(|s| !s.is_empty() && *s != NO_SELECTION)
            .collect()
    }
}

/// `"Demo "` + location (commas become `" -"`), keeping alphanumerics and
/// `.@#_- ` only.
pub fn network_name_for(location: &str) -> String {
    let raw = format!("{DEMO_LOCATION_PREFIX}{}", location.replace(',', " -"));
    raw.chars().filter(|c| c.is_alphanumeric() || ".@#_- ".contains(*c)).collect()
}

/// User-facing reasons a form is turned down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionRejection {
    #[error("Please fill in a location and select the devices to deploy!")]
    EmptyForm,
    #[error("You need to specify a location for the network name!")]
    MissingLocation,
    #[error("That location/name is already used by an existing network!")]
    NameTaken,
    #[error("Please select serial numbers that are available in inventory!")]
    NoAvailableSerials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Rejected(ProvisionRejection),
    Created { name: String, net_id: String, devices: usize },
}

/// Unclaimed serials offered on the form, per product family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryChoices {
    pub mx: Vec<InventoryDevice>,
    pub ms: Vec<InventoryDevice>,
    pub mr: Vec<InventoryDevice>,
    pub mv: Vec<InventoryDevice>,
}

impl InventoryChoices {
    /// Up to seven unused devices per family, highest model first.
    pub fn from_inventory(inventory: &[InventoryDevice]) -> Self {
        let pick = |prefixes: &[&str]| {
            let mut devices: Vec<InventoryDevice> = inventory
                .iter()
                .filter(|d| d.is_unused() && prefixes.iter().any(|p| d.model.starts_with(p)))
                .take(CHOICES_PER_FAMILY)
                .cloned()
                .collect();
            devices.sort_by(|a, b| b.model.cmp(&a.model));
            devices
        };
        Self {
            mx: pick(&["MX", "Z1", "Z3"]),
            ms: pick(&["MS"]),
            mr: pick(&["MR"]),
            mv: pick(&["MV"]),
        }
    }

    /// Markdown list of the choices, for text-only chat clients.
    pub fn render(&self) -> String {
        let mut message = String::from("Available devices:");
        for (family, devices) in [("MX", &self.mx), ("MS", &self.ms), ("MR", &self.mr), ("MV", &self.mv)] {
            let listed = if devices.is_empty() {
                "(none available)".to_string()
            } else {
                devices.iter().map(|d| format!("{} ({})", d.serial, d.model)).collect::<Vec<_>>().join(", ")
            };
            message.push_str(&format!("  \n- **{family}**: {listed}"));
        }
        message
    }
}

/// Creates a network and claims the selected serials.
pub struct ProvisionBot {
    api: Arc<dyn DashboardApi>,
    notifier: Arc<dyn Notifier>,
}

impl ProvisionBot {
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, notifier }
    }

    /// Unclaimed inventory to offer on the form.
    pub async fn choices(&self, org_id: &str) -> Result<InventoryChoices> {
        Ok(InventoryChoices::from_inventory(&self.api.get_inventory(org_id).await?))
    }

    /// Validate the form, then create the network and claim devices.
    ///
    /// Rejections are posted to chat and returned as
    /// [`ProvisionOutcome::Rejected`]; API failures are errors.
    #[instrument(skip(self, form))]
    pub async fn handle(&self, org_id: &str, form: &ProvisionForm) -> Result<ProvisionOutcome> {
        match self.provision(org_id, form).await? {
            ProvisionOutcome::Rejected(reason) => {
                warn!(%reason, "provisioning request rejected");
                self.notifier.post_message(&reason.to_string()).await?;
                Ok(ProvisionOutcome::Rejected(reason))
            }
            created => Ok(created),
        }
    }

    async fn provision(&self, org_id: &str, form: &ProvisionForm) -> Result<ProvisionOutcome> {
        if form.is_empty() {
            return Ok(ProvisionOutcome::Rejected(ProvisionRejection::EmptyForm));
        }
        let Some(location) = form.location.as_deref().map(str::trim).filter(|l| !l.is_empty())
        else {
            return Ok(ProvisionOutcome::Rejected(ProvisionRejection::MissingLocation));
        };

        let name = network_name_for(location);
        let networks = self.api.get_networks(org_id).await?;
        if networks.iter().any(|n| n.name == name) {
            return Ok(ProvisionOutcome::Rejected(ProvisionRejection::NameTaken));
        }

        let inventory = self.api.get_inventory(org_id).await?;
        let unused: HashSet<&str> =
            inventory.iter().filter(|d| d.is_unused()).map(|d| d.serial.as_str()).collect();
        let selected = form.selected_serials();
        if !selected.iter().any(|s| unused.contains(s)) {
            return Ok(ProvisionOutcome::Rejected(ProvisionRejection::NoAvailableSerials));
        }

        self.notifier.post_message("One moment please...").await?;
        let network =
            self.api.create_network(org_id, &CreateNetworkRequest::new(&name, DEMO_NETWORK_TYPE)).await?;

        let address = match form.address.as_deref().map(str::trim) {
            Some(street) if !street.is_empty() => format!("{street}, {location}"),
            _ => location.to_string(),
        };
        let update = UpdateDeviceRequest {
            name: Some("Device".into()),
            address: Some(address),
            move_map_marker: Some(true),
            ..UpdateDeviceRequest::default()
        };

        let mut devices = 0;
        for serial in selected {
            if let Err(err) = self.api.claim_device(&network.id, serial).await {
                warn!(serial, error = %err, "claim failed");
                continue;
            }
            devices += 1;
            if let Err(err) = self.api.update_device(&network.id, serial, &update).await {
                warn!(serial, error = %err, "device update failed");
            }
        }

        self.notifier
            .post_message(&format!("Network **{name}** created with **{devices}** devices deployed!"))
            .await?;
        info!(net_id = %network.id, devices, "network provisioned");
        Ok(ProvisionOutcome::Created { name, net_id: network.id, devices })
    }
}
