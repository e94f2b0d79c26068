//! Demo provisioning progress and inventory input
//!
//! [`DemoState`] is the whole persisted state file. Each
//! [`ProvisioningRecord`] only ever moves forward:
//! `networked -> devices-claimed -> configured`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::{DEMO_LOCATION_PREFIX, MAX_SITE_NUMBER};
use crate::errors::{DashOpsError, Result};
use crate::impl_domain_status_conversions;

/// Where a network stands in the demo workflow. Teardown deletes the state
/// file, so a torn-down demo reads as `Unprovisioned` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProvisioningStage {
    Unprovisioned,
    Networked,
    DevicesClaimed,
    Configured,
}

impl_domain_status_conversions!(ProvisioningStage {
    Unprovisioned => "unprovisioned",
    Networked => "networked",
    DevicesClaimed => "devices-claimed",
    Configured => "configured",
});

/// Role a claimed device plays in a demo site; persisted as its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceRole {
    #[serde(rename = "SD-WAN UTM gateway")]
    Gateway,
    #[serde(rename = "Teleworker gateway")]
    TeleworkerGateway,
    #[serde(rename = "Access switch")]
    Switch,
    #[serde(rename = "Wireless AP")]
    AccessPoint,
    #[serde(rename = "Security camera")]
    Camera,
}

impl DeviceRole {
    pub fn description(self) -> &'static str {
        match self {
            Self::Gateway => "SD-WAN UTM gateway",
            Self::TeleworkerGateway => "Teleworker gateway",
            Self::Switch => "Access switch",
            Self::AccessPoint => "Wireless AP",
            Self::Camera => "Security camera",
        }
    }
}

impl std::fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// One device slot of a site. `serial` is `None` when the site has no such
/// device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub serial: Option<String>,
    pub description: DeviceRole,
}

impl DeviceEntry {
    pub fn new(serial: Option<String>, description: DeviceRole) -> Self {
        Self { serial, description }
    }
}

/// Persisted progress for one demo network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningRecord {
    pub net_id: String,
    pub location: String,
    pub site: u32,
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mgmt_vlan: Option<u32>,
    #[serde(default)]
    pub settings_created: bool,
}

impl ProvisioningRecord {
    pub fn new(net_id: impl Into<String>, location: impl Into<String>, site: u32) -> Self {
        Self {
            net_id: net_id.into(),
            location: location.into(),
            site,
            devices: Vec::new(),
            mgmt_vlan: None,
            settings_created: false,
        }
    }

    pub fn stage(&self) -> ProvisioningStage {
        if self.settings_created {
            ProvisioningStage::Configured
        } else if self.devices.is_empty() {
            ProvisioningStage::Networked
        } else {
            ProvisioningStage::DevicesClaimed
        }
    }

    pub fn is_teleworker(&self) -> bool {
        self.devices.iter().any(|d| d.description == DeviceRole::TeleworkerGateway)
    }

    /// Serial of the first device in `role`, if the slot is filled.
    pub fn serial_for(&self, role: DeviceRole) -> Option<&str> {
        self.devices
            .iter()
            .find(|d| d.description == role)
            .and_then(|d| d.serial.as_deref())
    }

    pub fn camera_serial(&self) -> Option<&str> {
        self.serial_for(DeviceRole::Camera)
    }
}

/// Whole contents of the demo state file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoState {
    pub api_key: String,
    pub org_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tags: Option<Vec<String>>,
    #[serde(default)]
    pub networks: Vec<ProvisioningRecord>,
}

impl DemoState {
    pub fn new(api_key: impl Into<String>, org_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            org_id: org_id.into(),
            user_name: None,
            custom_tags: None,
            networks: Vec::new(),
        }
    }

    /// Stage of the demo as a whole. Devices are claimed for every network
    /// in one batch, so the first record speaks for all of them; the demo is
    /// configured only once every network is.
    pub fn stage(&self) -> ProvisioningStage {
        let Some(first) = self.networks.first() else {
            return ProvisioningStage::Unprovisioned;
        };
        if self.networks.iter().all(|n| n.stage() == ProvisioningStage::Configured) {
            ProvisioningStage::Configured
        } else {
            first.stage().min(ProvisioningStage::DevicesClaimed)
        }
    }

    pub fn tags(&self) -> &[String] {
        self.custom_tags.as_deref().unwrap_or_default()
    }

    pub fn user(&self) -> &str {
        self.user_name.as_deref().unwrap_or_default()
    }
}

/// One row of the demo inventory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySite {
    /// Sequence number N used for VLAN ids and subnets.
    pub site: u32,
    pub location: String,
    pub time_zone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub mx_serial: Option<String>,
    #[serde(default)]
    pub ms_serial: Option<String>,
    #[serde(default)]
    pub mr_serial: Option<String>,
    #[serde(default)]
    pub mv_serial: Option<String>,
    pub mgmt_vlan: u32,
    #[serde(default)]
    pub ms_ip: Option<String>,
    #[serde(default)]
    pub mr_ip: Option<String>,
}

impl InventorySite {
    /// `"Demo "` + location with commas turned into `" -"`.
    pub fn network_name(&self) -> String {
        format!("{DEMO_LOCATION_PREFIX}{}", self.location.replace(',', " -"))
    }

    /// Street address for device placement; the location when none is given.
    pub fn device_address(&self) -> String {
        match self.address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => address.to_string(),
            _ => self.location.replace(',', " -"),
        }
    }

    /// `(serial, role)` slots in gateway, switch, AP, camera order.
    pub fn device_slots(&self) -> [(Option<&str>, DeviceRole); 4] {
        [
            (non_blank(self.mx_serial.as_deref()), DeviceRole::Gateway),
            (non_blank(self.ms_serial.as_deref()), DeviceRole::Switch),
            (non_blank(self.mr_serial.as_deref()), DeviceRole::AccessPoint),
            (non_blank(self.mv_serial.as_deref()), DeviceRole::Camera),
        ]
    }

    fn validate(&self) -> Result<()> {
        if self.site == 0 || self.site > MAX_SITE_NUMBER {
            return Err(DashOpsError::InvalidInput(format!(
                "site {} for {} must be between 1 and {MAX_SITE_NUMBER}",
                self.site, self.location
            )));
        }
        if self.mgmt_vlan == 0 {
            return Err(DashOpsError::InvalidInput(format!(
                "management VLAN for {} must be non-zero",
                self.location
            )));
        }
        if self.location.trim().is_empty() {
            return Err(DashOpsError::InvalidInput(format!("site {} has no location", self.site)));
        }
        Ok(())
    }
}

/// Demo inventory file: `sites = [...]` in TOML or `{"sites": [...]}` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFile {
    pub sites: Vec<InventorySite>,
}

impl InventoryFile {
    /// Rejects empty inventories, out-of-range or repeated site numbers.
    pub fn validate(&self) -> Result<()> {
        if self.sites.is_empty() {
            return Err(DashOpsError::InvalidInput("inventory lists no sites".into()));
        }
        let mut seen = HashSet::new();
        for site in &self.sites {
            site.validate()?;
            if !seen.insert(site.site) {
                return Err(DashOpsError::InvalidInput(format!(
                    "site number {} appears more than once",
                    site.site
                )));
            }
        }
        Ok(())
    }

    pub fn network_names(&self) -> Vec<String> {
        self.sites.iter().map(InventorySite::network_name).collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
