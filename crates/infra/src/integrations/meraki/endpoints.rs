//! Typed dashboard endpoints

use async_trait::async_trait;
use dashops_core::{ActionBatchApi, DashboardApi};
use dashops_domain::{
    ActionBatch, ActionBatchResponse, BlinkRequest, ClaimRequest, CreateNetworkRequest, Device,
    DeviceStatus, InventoryDevice, Network, NetworkClient, Organization, Result,
    SnapshotRequest, SsidUpdate, SwitchPort, SwitchPortUpdate, UpdateDeviceRequest,
    UplinkLossLatency, UrlLink, VlansEnabledRequest,
};
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use super::client::MerakiClient;

/// Clients listed per page when checking home presence.
const CLIENTS_PER_PAGE: &str = "1000";

#[async_trait]
impl DashboardApi for MerakiClient {
    async fn get_organizations(&self) -> Result<Vec<Organization>> {
        self.get("/organizations").await
    }

    async fn get_networks(&self, org_id: &str) -> Result<Vec<Network>> {
        self.get(&format!("/organizations/{org_id}/networks")).await
    }

    async fn get_inventory(&self, org_id: &str) -> Result<Vec<InventoryDevice>> {
        self.get(&format!("/organizations/{org_id}/inventory")).await
    }

    async fn get_org_devices(&self, org_id: &str) -> Result<Vec<Device>> {
        self.get(&format!("/organizations/{org_id}/devices")).await
    }

    async fn get_device_statuses(&self, org_id: &str) -> Result<Vec<DeviceStatus>> {
        self.get(&format!("/organizations/{org_id}/deviceStatuses")).await
    }

    async fn get_uplinks_loss_latency(&self, org_id: &str) -> Result<Vec<UplinkLossLatency>> {
        self.get(&format!("/organizations/{org_id}/uplinksLossAndLatency")).await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    async fn create_network(
        &self,
        org_id: &str,
        request: &CreateNetworkRequest,
    ) -> Result<Network> {
        self.send_json(Method::POST, &format!("/organizations/{org_id}/networks"), request).await
    }

    #[instrument(skip(self))]
    async fn delete_network(&self, net_id: &str) -> Result<()> {
        self.send_unit::<Value>(Method::DELETE, &format!("/networks/{net_id}"), None).await
    }

    async fn enable_vlans(&self, net_id: &str, enabled: bool) -> Result<()> {
        self.send_unit(
            Method::PUT,
            &format!("/networks/{net_id}/vlansEnabledState"),
            Some(&VlansEnabledRequest { enabled }),
        )
        .await
    }

    async fn get_network_devices(&self, net_id: &str) -> Result<Vec<Device>> {
        self.get(&format!("/networks/{net_id}/devices")).await
    }

    async fn get_network_clients(&self, net_id: &str, t0: &str) -> Result<Vec<NetworkClient>> {
        self.get_with_query(
            &format!("/networks/{net_id}/clients"),
            &[("perPage", CLIENTS_PER_PAGE), ("t0", t0)],
        )
        .await
    }

    async fn open_ssid(&self, net_id: &str, number: u8, name: &str) -> Result<()> {
        self.send_unit(
            Method::PUT,
            &format!("/networks/{net_id}/ssids/{number}"),
            Some(&SsidUpdate::open(name)),
        )
        .await
    }

    async fn claim_device(&self, net_id: &str, serial: &str) -> Result<()> {
        self.send_unit(
            Method::POST,
            &format!("/networks/{net_id}/devices/claim"),
            Some(&ClaimRequest { serial: serial.to_string() }),
        )
        .await
    }

    async fn update_device(
        &self,
        net_id: &str,
        serial: &str,
        request: &UpdateDeviceRequest,
    ) -> Result<()> {
        self.send_unit(Method::PUT, &format!("/networks/{net_id}/devices/{serial}"), Some(request))
            .await
    }

    async fn blink_device(
        &self,
        net_id: &str,
        serial: &str,
        request: &BlinkRequest,
    ) -> Result<()> {
        self.send_unit(
            Method::POST,
            &format!("/networks/{net_id}/devices/{serial}/blinkLeds"),
            Some(request),
        )
        .await
    }

    async fn take_snapshot(
        &self,
        net_id: &str,
        serial: &str,
        timestamp: Option<&str>,
    ) -> Result<UrlLink> {
        let request = SnapshotRequest { timestamp: timestamp.map(str::to_string) };
        self.send_json(
            Method::POST,
            &format!("/networks/{net_id}/cameras/{serial}/snapshot"),
            &request,
        )
        .await
    }

    async fn get_video_link(
        &self,
        net_id: &str,
        serial: &str,
        timestamp: Option<&str>,
    ) -> Result<UrlLink> {
        let resource = format!("/networks/{net_id}/cameras/{serial}/videoLink");
        match timestamp {
            Some(timestamp) => self.get_with_query(&resource, &[("timestamp", timestamp)]).await,
            None => self.get(&resource).await,
        }
    }

    async fn get_switch_port(&self, serial: &str, port: u32) -> Result<SwitchPort> {
        self.get(&format!("/devices/{serial}/switchPorts/{port}")).await
    }

    async fn update_switch_port(
        &self,
        serial: &str,
        port: u32,
        request: &SwitchPortUpdate,
    ) -> Result<SwitchPort> {
        self.send_json(Method::PUT, &format!("/devices/{serial}/switchPorts/{port}"), request).await
    }
}

#[async_trait]
impl ActionBatchApi for MerakiClient {
    #[instrument(skip(self, batch), fields(actions = batch.actions.len()))]
    async fn create_action_batch(
        &self,
        org_id: &str,
        batch: &ActionBatch,
    ) -> Result<ActionBatchResponse> {
        self.send_json(Method::POST, &format!("/organizations/{org_id}/actionBatches"), batch).await
    }

    async fn get_action_batch(&self, org_id: &str, batch_id: &str) -> Result<ActionBatchResponse> {
        self.get(&format!("/organizations/{org_id}/actionBatches/{batch_id}")).await
    }
}
