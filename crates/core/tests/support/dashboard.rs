//! In-memory dashboard implementing both `DashboardApi` and `ActionBatchApi`.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use dashops_core::{ActionBatchApi, DashboardApi};
use dashops_domain::{
    ActionBatch, ActionBatchResponse, ActionOperation, BatchStatus, BlinkRequest,
    CreateNetworkRequest, DashOpsError, Device, DeviceStatus, InventoryDevice, Network,
    NetworkClient, Organization, Result, SwitchPort, SwitchPortUpdate, UpdateDeviceRequest,
    UplinkLossLatency, UrlLink,
};

pub fn api_error(status: u16) -> DashOpsError {
    DashOpsError::Api { status, body: format!("{{\"errors\":[\"HTTP {status}\"]}}") }
}

pub fn network(id: &str, name: &str) -> Network {
    Network {
        id: id.into(),
        name: name.into(),
        organization_id: None,
        network_type: None,
        time_zone: None,
    }
}

/// Canned data returned by the mock.
#[derive(Default)]
pub struct Fixture {
    pub organizations: Vec<Organization>,
    pub networks: Vec<Network>,
    pub inventory: Vec<InventoryDevice>,
    pub org_devices: Vec<Device>,
    pub network_devices: Vec<Device>,
    pub statuses: Vec<DeviceStatus>,
    pub uplinks: Vec<UplinkLossLatency>,
    pub clients: Vec<NetworkClient>,
    /// Orgs whose status and uplink endpoints answer 404.
    pub failing_orgs: HashSet<String>,
    /// Responses to batch creation, in order; default is a completed batch.
    pub batch_responses: VecDeque<ActionBatchResponse>,
    /// Responses to batch lookups; the last one repeats.
    pub poll_responses: VecDeque<ActionBatchResponse>,
    pub snapshot_failures: HashSet<String>,
    pub claim_failures: HashSet<String>,
    pub switch_ports: HashMap<(String, u32), bool>,
    pub ignore_port_updates: bool,
    /// Network and network-device listings answer with an API error.
    pub fail_networks: bool,
}

#[derive(Default)]
pub struct MockDashboard {
    pub fixture: Mutex<Fixture>,
    calls: Mutex<Vec<String>>,
    batches: Mutex<Vec<(String, ActionBatch)>>,
    next_id: Mutex<u32>,
}

impl MockDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, configure: impl FnOnce(&mut Fixture)) -> Self {
        configure(&mut self.fixture.lock().unwrap());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.starts_with(prefix)).collect()
    }

    /// Every batch submitted, with its org id.
    pub fn batches(&self) -> Vec<(String, ActionBatch)> {
        self.batches.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{prefix}{next}")
    }

    pub fn completed(id: &str) -> ActionBatchResponse {
        Self::response(id, BatchStatus { completed: true, failed: false, errors: vec![] })
    }

    pub fn pending(id: &str) -> ActionBatchResponse {
        Self::response(id, BatchStatus::default())
    }

    pub fn failed(id: &str, errors: &[&str]) -> ActionBatchResponse {
        Self::response(id, BatchStatus {
            completed: false,
            failed: true,
            errors: errors.iter().map(|e| (*e).to_string()).collect(),
        })
    }

    fn response(id: &str, status: BatchStatus) -> ActionBatchResponse {
        ActionBatchResponse { id: id.into(), status, confirmed: true, synchronous: true }
    }

    /// Network creations inside a completed batch take effect.
    fn apply(&self, batch: &ActionBatch) {
        for action in &batch.actions {
            let is_network_create = action.operation() == ActionOperation::Create
                && action.resource().starts_with("/organizations/")
                && action.resource().ends_with("/networks");
            if is_network_create {
                let name = action.body()["name"].as_str().unwrap_or_default().to_string();
                let id = self.next_id("N_");
                self.fixture.lock().unwrap().networks.push(network(&id, &name));
            }
        }
    }
}

#[async_trait]
impl DashboardApi for MockDashboard {
    async fn get_organizations(&self) -> Result<Vec<Organization>> {
        self.record("get_organizations".into());
        Ok(self.fixture.lock().unwrap().organizations.clone())
    }

    async fn get_networks(&self, org_id: &str) -> Result<Vec<Network>> {
        self.record(format!("get_networks:{org_id}"));
        let fixture = self.fixture.lock().unwrap();
        if fixture.fail_networks {
            return Err(api_error(500));
        }
        Ok(fixture.networks.clone())
    }

    async fn get_inventory(&self, org_id: &str) -> Result<Vec<InventoryDevice>> {
        self.record(format!("get_inventory:{org_id}"));
        Ok(self.fixture.lock().unwrap().inventory.clone())
    }

    async fn get_org_devices(&self, org_id: &str) -> Result<Vec<Device>> {
        self.record(format!("get_org_devices:{org_id}"));
        Ok(self.fixture.lock().unwrap().org_devices.clone())
    }

    async fn get_device_statuses(&self, org_id: &str) -> Result<Vec<DeviceStatus>> {
        self.record(format!("get_device_statuses:{org_id}"));
        let fixture = self.fixture.lock().unwrap();
        if fixture.failing_orgs.contains(org_id) {
            return Err(api_error(404));
        }
        Ok(fixture.statuses.clone())
    }

    async fn get_uplinks_loss_latency(&self, org_id: &str) -> Result<Vec<UplinkLossLatency>> {
        self.record(format!("get_uplinks_loss_latency:{org_id}"));
        let fixture = self.fixture.lock().unwrap();
        if fixture.failing_orgs.contains(org_id) {
            return Err(api_error(404));
        }
        Ok(fixture.uplinks.clone())
    }

    async fn create_network(
        &self,
        org_id: &str,
        request: &CreateNetworkRequest,
    ) -> Result<Network> {
        self.record(format!("create_network:{org_id}:{}", request.name));
        let created = network(&self.next_id("B_"), &request.name);
        self.fixture.lock().unwrap().networks.push(created.clone());
        Ok(created)
    }

    async fn delete_network(&self, net_id: &str) -> Result<()> {
        self.record(format!("delete_network:{net_id}"));
        self.fixture.lock().unwrap().networks.retain(|n| n.id != net_id);
        Ok(())
    }

    async fn enable_vlans(&self, net_id: &str, enabled: bool) -> Result<()> {
        self.record(format!("enable_vlans:{net_id}:{enabled}"));
        Ok(())
    }

    async fn get_network_devices(&self, net_id: &str) -> Result<Vec<Device>> {
        self.record(format!("get_network_devices:{net_id}"));
        let fixture = self.fixture.lock().unwrap();
        if fixture.fail_networks {
            return Err(api_error(403));
        }
        Ok(fixture.network_devices.clone())
    }

    async fn get_network_clients(&self, net_id: &str, t0: &str) -> Result<Vec<NetworkClient>> {
        self.record(format!("get_network_clients:{net_id}:{t0}"));
        Ok(self.fixture.lock().unwrap().clients.clone())
    }

    async fn open_ssid(&self, net_id: &str, number: u8, name: &str) -> Result<()> {
        self.record(format!("open_ssid:{net_id}:{number}:{name}"));
        Ok(())
    }

    async fn claim_device(&self, net_id: &str, serial: &str) -> Result<()> {
        self.record(format!("claim_device:{net_id}:{serial}"));
        if self.fixture.lock().unwrap().claim_failures.contains(serial) {
            return Err(api_error(400));
        }
        Ok(())
    }

    async fn update_device(
        &self,
        net_id: &str,
        serial: &str,
        request: &UpdateDeviceRequest,
    ) -> Result<()> {
        self.record(format!(
            "update_device:{net_id}:{serial}:{}",
            request.address.clone().unwrap_or_default()
        ));
        Ok(())
    }

    async fn blink_device(
        &self,
        net_id: &str,
        serial: &str,
        request: &BlinkRequest,
    ) -> Result<()> {
        self.record(format!("blink_device:{net_id}:{serial}:{}", request.duration));
        Ok(())
    }

    async fn take_snapshot(
        &self,
        net_id: &str,
        serial: &str,
        _timestamp: Option<&str>,
    ) -> Result<UrlLink> {
        self.record(format!("take_snapshot:{net_id}:{serial}"));
        if self.fixture.lock().unwrap().snapshot_failures.contains(serial) {
            return Err(api_error(400));
        }
        Ok(UrlLink { url: format!("https://snap.example/{serial}.jpg") })
    }

    async fn get_video_link(
        &self,
        net_id: &str,
        serial: &str,
        _timestamp: Option<&str>,
    ) -> Result<UrlLink> {
        self.record(format!("get_video_link:{net_id}:{serial}"));
        Ok(UrlLink { url: format!("https://video.example/{serial}") })
    }

    async fn get_switch_port(&self, serial: &str, port: u32) -> Result<SwitchPort> {
        self.record(format!("get_switch_port:{serial}:{port}"));
        let enabled = self
            .fixture
            .lock()
            .unwrap()
            .switch_ports
            .get(&(serial.to_string(), port))
            .copied()
            .ok_or_else(|| api_error(404))?;
        Ok(SwitchPort { enabled, name: None, port_type: None, poe_enabled: None })
    }

    async fn update_switch_port(
        &self,
        serial: &str,
        port: u32,
        request: &SwitchPortUpdate,
    ) -> Result<SwitchPort> {
        self.record(format!("update_switch_port:{serial}:{port}"));
        let mut fixture = self.fixture.lock().unwrap();
        let key = (serial.to_string(), port);
        if !fixture.ignore_port_updates {
            if let Some(enabled) = request.enabled {
                fixture.switch_ports.insert(key.clone(), enabled);
            }
        }
        let enabled = fixture.switch_ports.get(&key).copied().unwrap_or_default();
        Ok(SwitchPort { enabled, name: None, port_type: None, poe_enabled: None })
    }
}

#[async_trait]
impl ActionBatchApi for MockDashboard {
    async fn create_action_batch(
        &self,
        org_id: &str,
        batch: &ActionBatch,
    ) -> Result<ActionBatchResponse> {
        self.record(format!("create_action_batch:{org_id}"));
        self.batches.lock().unwrap().push((org_id.to_string(), batch.clone()));
        let queued = self.fixture.lock().unwrap().batch_responses.pop_front();
        let response = queued.unwrap_or_else(|| Self::completed(&self.next_id("batch-")));
        if response.status.completed {
            self.apply(batch);
        }
        Ok(response)
    }

    async fn get_action_batch(&self, org_id: &str, batch_id: &str) -> Result<ActionBatchResponse> {
        self.record(format!("get_action_batch:{org_id}:{batch_id}"));
        let mut fixture = self.fixture.lock().unwrap();
        let response = if fixture.poll_responses.len() > 1 {
            fixture.poll_responses.pop_front()
        } else {
            fixture.poll_responses.front().cloned()
        };
        response.ok_or_else(|| api_error(404))
    }
}
