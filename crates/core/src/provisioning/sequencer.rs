//! Demo provisioning sequencer
//!
//! Drives each inventory site through
//! `unprovisioned -> networked -> devices-claimed -> configured`, and tears
//! everything down at the end. Every stage reads its guard from the
//! [`DemoState`] and writes the state back after each change, so any stage
//! can be re-run safely.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use dashops_common::{poll_until, PollError, PollPolicy, PollStep};
use dashops_domain::constants::{
    CREATE_DEVICES_FILE, CREATE_NETWORKS_FILE, CREATE_SETTINGS_PREFIX, DEMO_BASE_NETWORK_NAME,
    DEMO_BLINK_SECONDS, DEMO_NETWORK_TYPE, DEMO_SSID_NAME, SNAPSHOT_FILE_PREFIX,
};
use dashops_domain::{
    ActionBatch, BlinkRequest, CreateNetworkRequest, DashOpsError, DemoState, DeviceEntry,
    DeviceRole, DeviceState, InventoryFile, InventorySite, ProvisioningRecord, ProvisioningStage,
    Result,
};
use tracing::{info, instrument, warn};

use super::actions;
use super::ports::{ArtifactStore, StateStore, TagPicker};
use crate::batch::{BatchResult, BatchSubmitter};
use crate::dashboard_ports::DashboardApi;
use crate::media_ports::SnapshotDownloader;
use crate::notify_ports::Notifier;

const FUN_MESSAGES: [&str; 3] = [
    "## 🎉🥂 Thank you for attending _[Adventure API Lab 2.0](http://cs.co/adventure2)_! 💪📝",
    "## ✅😇 Check out the Developer Hub @ meraki.io! 🌎💚",
    "## 🌟💫 Hope you enjoyed this lab, and thanks for watching! 🤜🤛",
];

/// One entry of the demo menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoStage {
    CreateNetworks,
    ClaimDevices,
    ConfigureSettings,
    Fun,
    Teardown,
}

impl DemoStage {
    pub const ALL: [Self; 5] =
        [Self::CreateNetworks, Self::ClaimDevices, Self::ConfigureSettings, Self::Fun, Self::Teardown];

    /// Accepts the menu number or a keyword (`network`, `device`,
    /// `setting`, `fun`, `reset`/`end`).
    pub fn from_menu_input(input: &str) -> Option<Self> {
        let input = input.trim().to_lowercase();
        let stage = if input.contains("network") || input == "1" {
            Self::CreateNetworks
        } else if input.contains("device") || input == "2" {
            Self::ClaimDevices
        } else if input.contains("setting") || input == "3" {
            Self::ConfigureSettings
        } else if input.contains("fun") || input == "4" {
            Self::Fun
        } else if input.contains("reset") || input.contains("end") || input == "5" {
            Self::Teardown
        } else {
            return None;
        };
        Some(stage)
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Self::CreateNetworks => "Create your networks",
            Self::ClaimDevices => "Add devices to them",
            Self::ConfigureSettings => "Configure many settings",
            Self::Fun => "Have some fun!",
            Self::Teardown => "Reset & end this demo!",
        }
    }
}

/// Why a stage did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NetworksExist,
    NetworksMissing,
    DevicesClaimed,
    DevicesMissing,
}

/// Why a stage that needs the demo at `needed` cannot run yet.
fn missing_stage(state: &DemoState, needed: ProvisioningStage) -> Option<SkipReason> {
    let current = state.stage();
    if current >= needed {
        None
    } else if current < ProvisioningStage::Networked {
        Some(SkipReason::NetworksMissing)
    } else {
        Some(SkipReason::DevicesMissing)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NetworksExist => "Networks already created!",
            Self::NetworksMissing => "Networks need to be created first!",
            Self::DevicesClaimed => "Devices already added!",
            Self::DevicesMissing => "Devices need to be added first!",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunReport {
    pub blinked: Vec<DeviceRole>,
    pub camera_online: bool,
    pub snapshots_sent: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub deleted_networks: Vec<String>,
    pub removed_files: Vec<PathBuf>,
}

/// Result of running one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Skipped(SkipReason),
    Batches(Vec<BatchResult>),
    Fun(FunReport),
    TornDown(TeardownReport),
}

/// Runs the demo stages against the dashboard.
pub struct ProvisioningSequencer {
    api: Arc<dyn DashboardApi>,
    submitter: BatchSubmitter,
    store: Arc<dyn StateStore>,
    artifacts: Arc<dyn ArtifactStore>,
    notifier: Arc<dyn Notifier>,
    downloader: Arc<dyn SnapshotDownloader>,
    picker: Arc<dyn TagPicker>,
    camera_wait: PollPolicy,
}

impl ProvisioningSequencer {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        submitter: BatchSubmitter,
        store: Arc<dyn StateStore>,
        artifacts: Arc<dyn ArtifactStore>,
        notifier: Arc<dyn Notifier>,
        downloader: Arc<dyn SnapshotDownloader>,
        picker: Arc<dyn TagPicker>,
    ) -> Self {
        Self {
            api,
            submitter,
            store,
            artifacts,
            notifier,
            downloader,
            picker,
            camera_wait: PollPolicy::fixed(6, Duration::from_secs(6)).wait_first(),
        }
    }

    /// Override how long the fun stage waits for the camera to come online.
    pub fn with_camera_wait(mut self, policy: PollPolicy) -> Self {
        self.camera_wait = policy;
        self
    }

    /// Stored state with fresh credentials, or a new state.
    pub async fn load_state(&self, api_key: &str, org_id: &str) -> Result<DemoState> {
        Ok(match self.store.load().await? {
            Some(mut state) => {
                state.api_key = api_key.to_string();
                state.org_id = org_id.to_string();
                state
            }
            None => DemoState::new(api_key, org_id),
        })
    }

    pub async fn save_state(&self, state: &DemoState) -> Result<()> {
        self.store.save(state).await
    }

    /// Dispatch one menu stage.
    pub async fn run(
        &self,
        stage: DemoStage,
        state: &mut DemoState,
        inventory: &InventoryFile,
    ) -> Result<StageOutcome> {
        match stage {
            DemoStage::CreateNetworks => self.create_networks(state, inventory).await,
            DemoStage::ClaimDevices => self.claim_devices(state, inventory).await,
            DemoStage::ConfigureSettings => self.configure_settings(state, inventory).await,
            DemoStage::Fun => self.fun(state).await,
            DemoStage::Teardown => self.teardown(state).await.map(StageOutcome::TornDown),
        }
    }

    /// Stage 1: one synchronous batch creating a network per site, cloned
    /// from a base network with VLANs enabled.
    #[instrument(skip_all, fields(org_id = %state.org_id))]
    pub async fn create_networks(
        &self,
        state: &mut DemoState,
        inventory: &InventoryFile,
    ) -> Result<StageOutcome> {
        inventory.validate()?;
        let org_id = state.org_id.clone();
        let names = inventory.network_names();

        let existing = self.api.get_networks(&org_id).await?;
        if existing.iter().any(|n| names.contains(&n.name)) {
            info!("demo networks already exist");
            return Ok(StageOutcome::Skipped(SkipReason::NetworksExist));
        }

        let (base_id, created_base) =
            match existing.iter().find(|n| n.name == DEMO_BASE_NETWORK_NAME) {
                Some(base) => (base.id.clone(), false),
                None => {
                    let name = format!("Demo {}", Local::now().format("%Y-%m-%d_%H-%M-%S"));
                    let base = self
                        .api
                        .create_network(&org_id, &CreateNetworkRequest::new(name, DEMO_NETWORK_TYPE))
                        .await?;
                    info!(net_id = %base.id, "created temporary base network");
                    (base.id, true)
                }
            };

        let submitted = self.submit_network_batch(state, inventory, &base_id).await;

        if created_base {
            if let Err(err) = self.api.delete_network(&base_id).await {
                warn!(net_id = %base_id, error = %err, "failed to delete temporary base network");
            }
        }
        let result = submitted?;

        let networks = self.api.get_networks(&org_id).await?;
        let by_name: HashMap<&str, &str> =
            networks.iter().map(|n| (n.name.as_str(), n.id.as_str())).collect();
        state.networks = inventory
            .sites
            .iter()
            .filter_map(|site| {
                let name = site.network_name();
                by_name.get(name.as_str()).map(|id| ProvisioningRecord::new(*id, name.clone(), site.site))
            })
            .collect();
        self.store.save(state).await?;
        info!(recorded = state.networks.len(), "demo networks recorded");

        Ok(StageOutcome::Batches(vec![result]))
    }

    async fn submit_network_batch(
        &self,
        state: &DemoState,
        inventory: &InventoryFile,
        base_id: &str,
    ) -> Result<BatchResult> {
        if let Err(err) = self.api.enable_vlans(base_id, true).await {
            warn!(net_id = %base_id, error = %err, "failed to enable VLANs on base network");
        }

        let actions = inventory
            .sites
            .iter()
            .map(|site| {
                actions::create_network(
                    &state.org_id,
                    &site.network_name(),
                    actions::random_tags(self.picker.as_ref(), state.tags()),
                    base_id,
                    &site.time_zone,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let batch = ActionBatch::new(true, true, actions);
        let path = self.artifacts.write_batch(CREATE_NETWORKS_FILE, &batch).await?;
        info!(payload = %path.display(), "submitting network creation batch");
        self.submitter.submit_batch(&state.org_id, &batch).await
    }

    /// Stage 2: one asynchronous batch claiming every listed serial, polled
    /// until done.
    #[instrument(skip_all, fields(org_id = %state.org_id))]
    pub async fn claim_devices(
        &self,
        state: &mut DemoState,
        inventory: &InventoryFile,
    ) -> Result<StageOutcome> {
        if let Some(reason) = missing_stage(state, ProvisioningStage::Networked) {
            return Ok(StageOutcome::Skipped(reason));
        }
        if state.stage() >= ProvisioningStage::DevicesClaimed {
            return Ok(StageOutcome::Skipped(SkipReason::DevicesClaimed));
        }

        let mut claimed = state.networks.clone();
        let mut actions = Vec::new();
        for record in &mut claimed {
            let Some(site) = site_for(inventory, record) else {
                warn!(location = %record.location, "no inventory row for recorded network");
                continue;
            };
            record.devices = site
                .device_slots()
                .iter()
                .map(|(serial, role)| DeviceEntry::new(serial.map(str::to_string), *role))
                .collect();
            record.mgmt_vlan = Some(site.mgmt_vlan);
            for serial in record.devices.iter().filter_map(|d| d.serial.as_deref()) {
                actions.push(actions::claim_device(&record.net_id, serial)?);
            }
        }

        let batch = ActionBatch::new(true, false, actions);
        let path = self.artifacts.write_batch(CREATE_DEVICES_FILE, &batch).await?;
        info!(payload = %path.display(), "submitting device claim batch");
        let result = self.submitter.submit_and_wait(&state.org_id, &batch).await?;

        if !result.is_completed() {
            warn!(batch_id = %result.batch_id, "device claim batch did not complete");
            return Ok(StageOutcome::Batches(vec![result]));
        }

        match self.api.get_inventory(&state.org_id).await {
            Ok(inventory) => {
                let teleworkers: HashSet<&str> = inventory
                    .iter()
                    .filter(|d| d.is_teleworker())
                    .map(|d| d.serial.as_str())
                    .collect();
                mark_teleworkers(&mut claimed, &teleworkers);
            }
            Err(err) => warn!(error = %err, "inventory lookup failed; teleworker roles not set"),
        }

        state.networks = claimed;
        self.store.save(state).await?;
        Ok(StageOutcome::Batches(vec![result]))
    }

    /// Stage 3: one synchronous batch per network, in input order.
    ///
    /// Networks already marked `settings_created` are skipped entirely.
    #[instrument(skip_all, fields(org_id = %state.org_id))]
    pub async fn configure_settings(
        &self,
        state: &mut DemoState,
        inventory: &InventoryFile,
    ) -> Result<StageOutcome> {
        if let Some(reason) = missing_stage(state, ProvisioningStage::DevicesClaimed) {
            return Ok(StageOutcome::Skipped(reason));
        }

        let models: HashMap<String, String> = self
            .api
            .get_inventory(&state.org_id)
            .await?
            .into_iter()
            .filter(|d| !d.is_unused())
            .map(|d| (d.serial, d.model))
            .collect();

        let mut results = Vec::new();
        for index in 0..state.networks.len() {
            let record = state.networks[index].clone();
            if record.stage() == ProvisioningStage::Configured {
                info!(net_id = %record.net_id, "settings already applied; skipping");
                continue;
            }
            let Some(site) = site_for(inventory, &record) else {
                warn!(location = %record.location, "no inventory row for recorded network");
                continue;
            };

            let batch = self.settings_batch(state, &record, site, &models).await?;
            let file_name = format!("{CREATE_SETTINGS_PREFIX}{}.json", index + 1);
            let path = self.artifacts.write_batch(&file_name, &batch).await?;
            info!(payload = %path.display(), net_id = %record.net_id, "submitting settings batch");

            match self.submitter.submit_batch(&state.org_id, &batch).await {
                Ok(result) => {
                    state.networks[index].settings_created = result.is_completed();
                    self.store.save(state).await?;
                    results.push(result);
                }
                Err(err) => {
                    self.store.save(state).await?;
                    return Err(err);
                }
            }
        }

        Ok(StageOutcome::Batches(results))
    }

    async fn settings_batch(
        &self,
        state: &DemoState,
        record: &ProvisioningRecord,
        site: &InventorySite,
        models: &HashMap<String, String>,
    ) -> Result<ActionBatch> {
        let net_id = record.net_id.as_str();
        let mgmt_vlan = record.mgmt_vlan.unwrap_or(site.mgmt_vlan);
        let address = site.device_address();
        let picker = self.picker.as_ref();

        let mut batch_actions = Vec::new();
        for device in &record.devices {
            if let Some(serial) = device.serial.as_deref() {
                batch_actions.push(actions::configure_device(
                    net_id,
                    serial,
                    device.description,
                    actions::random_tags(picker, state.tags()),
                    &address,
                    state.user(),
                )?);
            }
        }

        if let Err(err) = self.api.open_ssid(net_id, 0, DEMO_SSID_NAME).await {
            warn!(net_id, error = %err, "failed to open SSID");
        }

        let managed = [
            (record.serial_for(DeviceRole::Switch), site.ms_ip.as_deref(), DeviceRole::Switch),
            (record.serial_for(DeviceRole::AccessPoint), site.mr_ip.as_deref(), DeviceRole::AccessPoint),
        ];
        for (serial, ip, role) in managed {
            if let (Some(serial), Some(ip)) = (serial, ip) {
                batch_actions.push(actions::management_interface(net_id, serial, ip, role, mgmt_vlan)?);
            }
        }

        batch_actions.extend(actions::site_vlans(net_id, record.site, mgmt_vlan)?);
        batch_actions.extend(actions::group_policies(net_id, record.is_teleworker())?);

        let gateway = record
            .serial_for(DeviceRole::Gateway)
            .or_else(|| record.serial_for(DeviceRole::TeleworkerGateway));
        if let Some(serial) = gateway {
            match models.get(serial) {
                Some(model) => {
                    batch_actions.push(actions::appliance_trunk_port(net_id, model, mgmt_vlan)?);
                }
                None => warn!(serial, "appliance model unknown; trunk port not configured"),
            }
        }

        if let Some(serial) = record.serial_for(DeviceRole::Switch) {
            batch_actions.extend(actions::switch_ports(
                serial,
                record.site,
                mgmt_vlan,
                picker,
                state.tags(),
            )?);
        }

        Ok(ActionBatch::new(true, true, batch_actions))
    }

    /// Stage 4: blink the first network's devices and send camera snapshots
    /// to chat.
    #[instrument(skip_all, fields(org_id = %state.org_id))]
    pub async fn fun(&self, state: &DemoState) -> Result<StageOutcome> {
        if let Some(reason) = missing_stage(state, ProvisioningStage::DevicesClaimed) {
            return Ok(StageOutcome::Skipped(reason));
        }
        let org_id = state.org_id.as_str();
        let Some(stage) = state.networks.first() else {
            return Ok(StageOutcome::Skipped(SkipReason::NetworksMissing));
        };

        let mut report = FunReport::default();
        let statuses = self.device_states(org_id).await?;
        let blink = BlinkRequest::for_seconds(DEMO_BLINK_SECONDS);
        for device in &stage.devices {
            let Some(serial) = device.serial.as_deref() else { continue };
            let online = statuses.get(serial).is_some_and(|s| *s != DeviceState::Offline);
            if !online {
                continue;
            }
            match self.api.blink_device(&stage.net_id, serial, &blink).await {
                Ok(()) => {
                    info!(serial, role = %device.description, "blinking");
                    report.blinked.push(device.description);
                }
                Err(err) => warn!(serial, error = %err, "blink failed"),
            }
        }

        let Some(camera) = stage.camera_serial() else {
            return Ok(StageOutcome::Fun(report));
        };

        let waited = poll_until(&self.camera_wait, |_| async move {
            let statuses = self.device_states(org_id).await?;
            let step = match statuses.get(camera) {
                Some(state) if *state != DeviceState::Offline => PollStep::Ready(()),
                _ => PollStep::Pending,
            };
            Ok::<_, DashOpsError>(step)
        })
        .await;
        match waited {
            Ok(()) => report.camera_online = true,
            Err(PollError::Exhausted { attempts }) => {
                warn!(camera, attempts, "camera never came online");
                return Ok(StageOutcome::Fun(report));
            }
            Err(PollError::Probe { source, .. }) => return Err(source),
        }

        for (index, message) in FUN_MESSAGES.iter().enumerate() {
            let link = match self.api.take_snapshot(&stage.net_id, camera, None).await {
                Ok(link) => link,
                Err(err) => {
                    warn!(camera, error = %err, "snapshot request failed");
                    continue;
                }
            };
            let name = format!("{SNAPSHOT_FILE_PREFIX}{}", index + 1);
            let Some(path) = self.downloader.download(&link.url, &name).await else {
                warn!(camera, url = %link.url, "snapshot never became available");
                continue;
            };
            match self.notifier.send_file(message, &path, "image/jpg").await {
                Ok(()) => report.snapshots_sent += 1,
                Err(err) => warn!(error = %err, "failed to send snapshot"),
            }
        }

        Ok(StageOutcome::Fun(report))
    }

    /// Stage 5: delete every recorded network and all local demo files.
    #[instrument(skip_all, fields(org_id = %state.org_id))]
    pub async fn teardown(&self, state: &DemoState) -> Result<TeardownReport> {
        let mut report = TeardownReport::default();
        for record in &state.networks {
            match self.api.delete_network(&record.net_id).await {
                Ok(()) => {
                    info!(net_id = %record.net_id, location = %record.location, "network deleted");
                    report.deleted_networks.push(record.location.clone());
                }
                Err(err) => warn!(net_id = %record.net_id, error = %err, "network delete failed"),
            }
        }

        self.store.remove().await?;
        report.removed_files = self.artifacts.remove_all().await?;
        Ok(report)
    }

    async fn device_states(&self, org_id: &str) -> Result<HashMap<String, DeviceState>> {
        Ok(self
            .api
            .get_device_statuses(org_id)
            .await?
            .into_iter()
            .map(|s| (s.serial, s.status))
            .collect())
    }
}

fn site_for<'a>(inventory: &'a InventoryFile, record: &ProvisioningRecord) -> Option<&'a InventorySite> {
    inventory.sites.iter().find(|site| site.network_name() == record.location)
}

fn mark_teleworkers(records: &mut [ProvisioningRecord], teleworkers: &HashSet<&str>) {
    for record in records {
        for device in &mut record.devices {
            let is_teleworker =
                device.serial.as_deref().is_some_and(|serial| teleworkers.contains(serial));
            if device.description == DeviceRole::Gateway && is_teleworker {
                device.description = DeviceRole::TeleworkerGateway;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_accepts_numbers_and_keywords() {
        assert_eq!(DemoStage::from_menu_input("1"), Some(DemoStage::CreateNetworks));
        assert_eq!(DemoStage::from_menu_input(" Add DEVICES "), Some(DemoStage::ClaimDevices));
        assert_eq!(DemoStage::from_menu_input("settings"), Some(DemoStage::ConfigureSettings));
        assert_eq!(DemoStage::from_menu_input("fun"), Some(DemoStage::Fun));
        assert_eq!(DemoStage::from_menu_input("the end"), Some(DemoStage::Teardown));
        assert_eq!(DemoStage::from_menu_input("6"), None);
    }

    #[test]
    fn only_gateways_become_teleworkers() {
        let mut record = ProvisioningRecord::new("N_1", "Demo A", 1);
        record.devices = vec![
            DeviceEntry::new(Some("Q2Z3".into()), DeviceRole::Gateway),
            DeviceEntry::new(Some("Q2MS".into()), DeviceRole::Switch),
        ];
        let mut records = vec![record];
        mark_teleworkers(&mut records, &HashSet::from(["Q2Z3", "Q2MS"]));
        assert_eq!(records[0].devices[0].description, DeviceRole::TeleworkerGateway);
        assert_eq!(records[0].devices[1].description, DeviceRole::Switch);
    }
}
