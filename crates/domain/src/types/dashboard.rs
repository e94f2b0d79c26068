//! Dashboard API request and response types

use serde::{Deserialize, Serialize};

use super::de::{string_or_number, tag_list};
use crate::constants::DEMO_DNS_SERVERS;
use crate::impl_domain_status_conversions;

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default, rename = "type")]
    pub network_type: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Device as listed by the organization or network device endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub serial: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
}

impl Device {
    /// Name when set, else MAC, else serial.
    pub fn display_name(&self) -> &str {
        display_name(self.name.as_deref(), self.mac.as_deref(), &self.serial)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// MX, Z1 and Z3 models.
    pub fn is_appliance(&self) -> bool {
        is_appliance_model(&self.model)
    }

    pub fn is_camera(&self) -> bool {
        self.model.starts_with("MV")
    }
}

/// Reported state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    Online,
    Alerting,
    Offline,
    #[serde(other)]
    Unknown,
}

impl_domain_status_conversions!(DeviceState {
    Online => "online",
    Alerting => "alerting",
    Offline => "offline",
    Unknown => "unknown",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    pub serial: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    pub status: DeviceState,
    #[serde(default)]
    pub network_id: Option<String>,
    /// Present only for appliances with a cellular uplink.
    #[serde(default)]
    pub using_cellular_failover: Option<bool>,
}

impl DeviceStatus {
    pub fn display_name(&self) -> &str {
        display_name(self.name.as_deref(), self.mac.as_deref(), &self.serial)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDevice {
    pub serial: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
}

impl InventoryDevice {
    /// Not yet claimed into any network.
    pub fn is_unused(&self) -> bool {
        self.network_id.as_deref().map_or(true, str::is_empty)
    }

    /// Z1/Z3 teleworker appliances.
    pub fn is_teleworker(&self) -> bool {
        self.model.starts_with("Z1") || self.model.starts_with("Z3")
    }
}

/// Loss/latency probe results for one uplink of one appliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UplinkLossLatency {
    pub serial: String,
    pub uplink: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub time_series: Vec<LossLatencySample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossLatencySample {
    #[serde(default)]
    pub loss_percent: Option<f64>,
    #[serde(default)]
    pub latency_ms: Option<f64>,
}

impl UplinkLossLatency {
    pub fn mean_loss(&self) -> Option<f64> {
        mean(self.time_series.iter().filter_map(|s| s.loss_percent))
    }

    pub fn mean_latency(&self) -> Option<f64> {
        mean(self.time_series.iter().filter_map(|s| s.latency_ms))
    }

    pub fn total_loss(&self) -> f64 {
        self.time_series.iter().filter_map(|s| s.loss_percent).sum()
    }

    pub fn total_latency(&self) -> f64 {
        self.time_series.iter().filter_map(|s| s.latency_ms).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkClient {
    pub mac: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// `{url}` response of the snapshot and video link endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlLink {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPort {
    pub enabled: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub port_type: Option<String>,
    #[serde(default)]
    pub poe_enabled: Option<bool>,
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNetworkRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub network_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_from_network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl CreateNetworkRequest {
    pub fn new(name: impl Into<String>, network_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            network_type: network_type.into(),
            tags: None,
            copy_from_network_id: None,
            time_zone: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlansEnabledRequest {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub serial: String,
}

/// Partial device update; unset fields are left untouched server side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_map_marker: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkRequest {
    pub duration: u32,
    pub period: u32,
    pub duty: u32,
}

impl Default for BlinkRequest {
    fn default() -> Self {
        Self { duration: 20, period: 160, duty: 50 }
    }
}

impl BlinkRequest {
    pub fn for_seconds(duration: u32) -> Self {
        Self { duration, ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsidUpdate {
    pub name: String,
    pub enabled: bool,
    pub auth_mode: String,
}

impl SsidUpdate {
    /// Enabled SSID without authentication.
    pub fn open(name: impl Into<String>) -> Self {
        Self { name: name.into(), enabled: true, auth_mode: "open".into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementInterfaceUpdate {
    pub wan1: Wan1Settings,
}

/// Static management addressing. `vlan` is sent as `null` when untagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wan1Settings {
    pub using_static_ip: bool,
    pub vlan: Option<u32>,
    pub static_ip: String,
    pub static_gateway_ip: String,
    pub static_subnet_mask: String,
    pub static_dns: Vec<String>,
}

impl Wan1Settings {
    /// Static /24 addressing with the appliance (`.1`) as gateway.
    pub fn static_ip(ip: &str, vlan: Option<u32>) -> Self {
        let gateway = match ip.rsplit_once('.') {
            Some((prefix, _)) => format!("{prefix}.1"),
            None => ip.to_string(),
        };
        Self {
            using_static_ip: true,
            vlan,
            static_ip: ip.to_string(),
            static_gateway_ip: gateway,
            static_subnet_mask: "255.255.255.0".into(),
            static_dns: DEMO_DNS_SERVERS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceVlan {
    pub id: u32,
    pub name: String,
    pub subnet: String,
    pub appliance_ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliancePortUpdate {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub port_type: String,
    pub drop_untagged_traffic: bool,
    pub vlan: u32,
    pub allowed_vlans: String,
}

impl AppliancePortUpdate {
    /// Trunk carrying all VLANs with `native_vlan` untagged.
    pub fn trunk(native_vlan: u32) -> Self {
        Self {
            enabled: true,
            port_type: "trunk".into(),
            drop_untagged_traffic: false,
            vlan: native_vlan,
            allowed_vlans: "all".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPortUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub port_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl SwitchPortUpdate {
    pub fn enabled(enabled: bool) -> Self {
        Self { enabled: Some(enabled), ..Self::default() }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// MX, Z1 and Z3 models.
pub fn is_appliance_model(model: &str) -> bool {
    ["MX", "Z1", "Z3"].iter().any(|prefix| model.starts_with(prefix))
}

fn display_name<'a>(name: Option<&'a str>, mac: Option<&'a str>, serial: &'a str) -> &'a str {
    name.filter(|n| !n.is_empty()).or(mac.filter(|m| !m.is_empty())).unwrap_or(serial)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}
