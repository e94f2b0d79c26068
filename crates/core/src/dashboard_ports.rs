//! Port interface for the dashboard REST API
//!
//! Every method maps to one endpoint. Non-2xx answers surface as
//! `DashOpsError::Api { status, body }` with the raw response text.

use async_trait::async_trait;
use dashops_domain::{
    BlinkRequest, CreateNetworkRequest, Device, DeviceStatus, InventoryDevice, Network,
    NetworkClient, Organization, Result, SwitchPort, SwitchPortUpdate, UpdateDeviceRequest,
    UplinkLossLatency, UrlLink,
};

/// Typed access to the dashboard endpoints used by the tools.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    // Organizations
    async fn get_organizations(&self) -> Result<Vec<Organization>>;
    async fn get_networks(&self, org_id: &str) -> Result<Vec<Network>>;
    async fn get_inventory(&self, org_id: &str) -> Result<Vec<InventoryDevice>>;
    async fn get_org_devices(&self, org_id: &str) -> Result<Vec<Device>>;
    async fn get_device_statuses(&self, org_id: &str) -> Result<Vec<DeviceStatus>>;
    async fn get_uplinks_loss_latency(&self, org_id: &str) -> Result<Vec<UplinkLossLatency>>;

    // Networks
    async fn create_network(&self, org_id: &str, request: &CreateNetworkRequest)
        -> Result<Network>;
    async fn delete_network(&self, net_id: &str) -> Result<()>;
    async fn enable_vlans(&self, net_id: &str, enabled: bool) -> Result<()>;
    async fn get_network_devices(&self, net_id: &str) -> Result<Vec<Device>>;

    /// Clients seen since `t0` (ISO-8601).
    async fn get_network_clients(&self, net_id: &str, t0: &str) -> Result<Vec<NetworkClient>>;

    /// Opens SSID `number` without authentication under `name`.
    async fn open_ssid(&self, net_id: &str, number: u8, name: &str) -> Result<()>;

    // Devices
    async fn claim_device(&self, net_id: &str, serial: &str) -> Result<()>;
    async fn update_device(
        &self,
        net_id: &str,
        serial: &str,
        request: &UpdateDeviceRequest,
    ) -> Result<()>;
    async fn blink_device(&self, net_id: &str, serial: &str, request: &BlinkRequest)
        -> Result<()>;

    // Cameras
    /// Requests a snapshot; the returned URL may not serve the image yet.
    async fn take_snapshot(
        &self,
        net_id: &str,
        serial: &str,
        timestamp: Option<&str>,
    ) -> Result<UrlLink>;
    async fn get_video_link(
        &self,
        net_id: &str,
        serial: &str,
        timestamp: Option<&str>,
    ) -> Result<UrlLink>;

    // Switch ports
    async fn get_switch_port(&self, serial: &str, port: u32) -> Result<SwitchPort>;
    async fn update_switch_port(
        &self,
        serial: &str,
        port: u32,
        request: &SwitchPortUpdate,
    ) -> Result<SwitchPort>;
}
