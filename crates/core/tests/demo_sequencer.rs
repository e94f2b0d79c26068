//! Demo stages driven end to end against in-memory ports.

mod support;

use std::sync::Arc;
use std::time::Duration;

use dashops_common::PollPolicy;
use dashops_core::{BatchSubmitter, DemoStage, ProvisioningSequencer, SkipReason, StageOutcome};
use dashops_domain::{
    ActionOperation, DemoState, DeviceEntry, DeviceRole, DeviceState, DeviceStatus,
    InventoryDevice, InventoryFile, InventorySite, ProvisioningRecord, ProvisioningStage,
};
use support::{
    network, FixedPicker, MemoryArtifacts, MemoryStateStore, MockDashboard, RecordingNotifier,
    StubDownloader,
};

struct Harness {
    mock: Arc<MockDashboard>,
    store: Arc<MemoryStateStore>,
    artifacts: Arc<MemoryArtifacts>,
    notifier: Arc<RecordingNotifier>,
    sequencer: ProvisioningSequencer,
}

fn harness(mock: MockDashboard, store: MemoryStateStore) -> Harness {
    let mock = Arc::new(mock);
    let store = Arc::new(store);
    let artifacts = Arc::new(MemoryArtifacts::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let submitter = BatchSubmitter::new(mock.clone())
        .with_poll_policy(PollPolicy::fixed(3, Duration::ZERO));
    let sequencer = ProvisioningSequencer::new(
        mock.clone(),
        submitter,
        store.clone(),
        artifacts.clone(),
        notifier.clone(),
        Arc::new(StubDownloader::default()),
        Arc::new(FixedPicker),
    )
    .with_camera_wait(PollPolicy::fixed(2, Duration::ZERO));
    Harness { mock, store, artifacts, notifier, sequencer }
}

fn site(number: u32, location: &str) -> InventorySite {
    InventorySite {
        site: number,
        location: location.into(),
        time_zone: "America/Los_Angeles".into(),
        address: None,
        mx_serial: Some(format!("Q2MX-000{number}")),
        ms_serial: Some(format!("Q2MS-000{number}")),
        mr_serial: Some(format!("Q2MR-000{number}")),
        mv_serial: None,
        mgmt_vlan: 1,
        ms_ip: Some(format!("10.0.{number}.2")),
        mr_ip: Some(format!("10.0.{number}.3")),
    }
}

fn inventory_device(serial: &str, model: &str) -> InventoryDevice {
    InventoryDevice {
        serial: serial.into(),
        model: model.into(),
        mac: None,
        network_id: Some("N_1".into()),
    }
}

fn claimed_record(net_id: &str, site: &InventorySite) -> ProvisioningRecord {
    let mut record = ProvisioningRecord::new(net_id, site.network_name(), site.site);
    record.devices = site
        .device_slots()
        .iter()
        .map(|(serial, role)| DeviceEntry::new(serial.map(str::to_string), *role))
        .collect();
    record.mgmt_vlan = Some(site.mgmt_vlan);
    record
}

#[tokio::test]
async fn create_networks_submits_one_synchronous_batch_and_records_ids() {
    let mock = MockDashboard::new().with(|f| f.networks.push(network("L_base", "Demo - ISP")));
    let h = harness(mock, MemoryStateStore::default());
    let inventory = InventoryFile { sites: vec![site(1, "Site A")] };
    let mut state = DemoState::new("key", "123");

    let outcome = h.sequencer.run(DemoStage::CreateNetworks, &mut state, &inventory).await.unwrap();

    let StageOutcome::Batches(results) = outcome else { panic!("expected a batch") };
    assert!(results[0].is_completed());

    let batches = h.mock.batches();
    assert_eq!(batches.len(), 1);
    let (org, batch) = &batches[0];
    assert_eq!(org, "123");
    assert!(batch.synchronous);
    assert_eq!(batch.actions.len(), 1);
    assert_eq!(batch.actions[0].resource(), "/organizations/123/networks");
    assert_eq!(batch.actions[0].operation(), ActionOperation::Create);
    assert_eq!(batch.actions[0].body()["copyFromNetworkId"], "L_base");

    assert_eq!(state.networks.len(), 1);
    assert_eq!(state.networks[0].location, "Demo Site A");
    assert!(state.networks[0].net_id.starts_with("N_"));
    assert_eq!(h.store.current(), Some(state));
    assert!(h.mock.calls_starting_with("delete_network").is_empty());
    assert_eq!(h.artifacts.names(), vec!["create_networks.json".to_string()]);
}

#[tokio::test]
async fn missing_base_network_is_created_and_removed() {
    let h = harness(MockDashboard::new(), MemoryStateStore::default());
    let inventory = InventoryFile { sites: vec![site(1, "Site A"), site(2, "Site B")] };
    let mut state = DemoState::new("key", "123");

    h.sequencer.create_networks(&mut state, &inventory).await.unwrap();

    let created = h.mock.calls_starting_with("create_network:123:Demo ");
    assert_eq!(created.len(), 1);
    assert_eq!(h.mock.calls_starting_with("delete_network:B_").len(), 1);
    assert_eq!(state.networks.len(), 2);
}

#[tokio::test]
async fn create_networks_skips_when_names_exist() {
    let mock = MockDashboard::new().with(|f| f.networks.push(network("N_9", "Demo Site A")));
    let h = harness(mock, MemoryStateStore::default());
    let inventory = InventoryFile { sites: vec![site(1, "Site A")] };
    let mut state = DemoState::new("key", "123");

    let outcome = h.sequencer.create_networks(&mut state, &inventory).await.unwrap();

    assert_eq!(outcome, StageOutcome::Skipped(SkipReason::NetworksExist));
    assert!(h.mock.batches().is_empty());
}

#[tokio::test]
async fn claim_devices_records_devices_and_teleworkers() {
    let inventory = InventoryFile { sites: vec![site(1, "Site A")] };
    let mock = MockDashboard::new().with(|f| {
        f.batch_responses.push_back(MockDashboard::pending("77"));
        f.poll_responses.push_back(MockDashboard::completed("77"));
        f.inventory.push(inventory_device("Q2MX-0001", "Z3"));
    });
    let h = harness(mock, MemoryStateStore::default());
    let mut state = DemoState::new("key", "123");
    state.networks.push(ProvisioningRecord::new("N_1", "Demo Site A", 1));

    let outcome = h.sequencer.claim_devices(&mut state, &inventory).await.unwrap();
    let StageOutcome::Batches(results) = outcome else { panic!("expected a batch") };
    assert!(results[0].is_completed());

    let (_, batch) = &h.mock.batches()[0];
    assert!(!batch.synchronous);
    assert_eq!(batch.actions.len(), 3);
    assert!(batch.actions.iter().all(|a| a.resource() == "/networks/N_1/devices"));

    let record = &state.networks[0];
    assert_eq!(record.serial_for(DeviceRole::TeleworkerGateway), Some("Q2MX-0001"));
    assert_eq!(record.serial_for(DeviceRole::Switch), Some("Q2MS-0001"));
    assert_eq!(record.devices.len(), 4);
    assert!(record.is_teleworker());
    assert!(h.store.current().is_some_and(|s| s.stage() == ProvisioningStage::DevicesClaimed));
}

#[tokio::test]
async fn failed_claim_batch_leaves_state_untouched() {
    let inventory = InventoryFile { sites: vec![site(1, "Site A")] };
    let mock = MockDashboard::new().with(|f| {
        f.batch_responses.push_back(MockDashboard::failed("8", &["Device already claimed"]));
    });
    let h = harness(mock, MemoryStateStore::default());
    let mut state = DemoState::new("key", "123");
    state.networks.push(ProvisioningRecord::new("N_1", "Demo Site A", 1));

    h.sequencer.claim_devices(&mut state, &inventory).await.unwrap();

    assert_eq!(state.stage(), ProvisioningStage::Networked);
    assert_eq!(h.store.saves(), 0);
}

#[tokio::test]
async fn stages_refuse_to_run_out_of_order() {
    let h = harness(MockDashboard::new(), MemoryStateStore::default());
    let inventory = InventoryFile { sites: vec![site(1, "Site A")] };
    let mut state = DemoState::new("key", "123");

    for stage in [DemoStage::ClaimDevices, DemoStage::ConfigureSettings, DemoStage::Fun] {
        let outcome = h.sequencer.run(stage, &mut state, &inventory).await.unwrap();
        assert_eq!(outcome, StageOutcome::Skipped(SkipReason::NetworksMissing));
    }

    state.networks.push(ProvisioningRecord::new("N_1", "Demo Site A", 1));
    let outcome = h.sequencer.configure_settings(&mut state, &inventory).await.unwrap();
    assert_eq!(outcome, StageOutcome::Skipped(SkipReason::DevicesMissing));
    assert!(h.mock.calls().is_empty());
}

#[tokio::test]
async fn settings_are_applied_once_per_network() {
    let sites = vec![site(1, "Site A"), site(2, "Site B")];
    let inventory = InventoryFile { sites: sites.clone() };
    let mock = MockDashboard::new().with(|f| {
        f.inventory.push(inventory_device("Q2MX-0001", "MX67"));
        f.inventory.push(inventory_device("Q2MX-0002", "MX67"));
    });
    let h = harness(mock, MemoryStateStore::default());
    let mut state = DemoState::new("key", "123");
    state.networks.push(claimed_record("N_1", &sites[0]));
    state.networks.push(claimed_record("N_2", &sites[1]));
    state.networks[0].settings_created = true;

    let outcome = h.sequencer.configure_settings(&mut state, &inventory).await.unwrap();
    let StageOutcome::Batches(results) = outcome else { panic!("expected batches") };
    assert_eq!(results.len(), 1);

    let batches = h.mock.batches();
    assert_eq!(batches.len(), 1);
    let resources: Vec<&str> = batches[0].1.actions.iter().map(|a| a.resource()).collect();
    assert!(resources.iter().all(|r| !r.contains("N_1")));
    assert!(resources.contains(&"/networks/N_2/vlans/1"));
    assert!(resources.contains(&"/networks/N_2/appliancePorts/5"));
    assert!(resources.contains(&"/devices/Q2MS-0002/switchPorts/7"));
    assert_eq!(h.artifacts.names(), vec!["create_settings_2.json".to_string()]);
    assert_eq!(h.mock.calls_starting_with("open_ssid:N_2:0").len(), 1);
    assert!(state.networks.iter().all(|n| n.settings_created));

    // Re-running submits nothing.
    h.sequencer.configure_settings(&mut state, &inventory).await.unwrap();
    assert_eq!(h.mock.batches().len(), 1);
}

#[tokio::test]
async fn failed_settings_batch_is_recorded_and_next_network_still_runs() {
    let sites = vec![site(1, "Site A"), site(2, "Site B")];
    let inventory = InventoryFile { sites: sites.clone() };
    let mock = MockDashboard::new().with(|f| {
        f.inventory.push(inventory_device("Q2MX-0001", "MX67"));
        f.inventory.push(inventory_device("Q2MX-0002", "MX67"));
        f.batch_responses.push_back(MockDashboard::failed("41", &["VLAN 11 already exists"]));
        f.batch_responses.push_back(MockDashboard::completed("42"));
    });
    let h = harness(mock, MemoryStateStore::default());
    let mut state = DemoState::new("key", "123");
    state.networks.push(claimed_record("N_1", &sites[0]));
    state.networks.push(claimed_record("N_2", &sites[1]));

    let outcome = h.sequencer.configure_settings(&mut state, &inventory).await.unwrap();
    let StageOutcome::Batches(results) = outcome else { panic!("expected batches") };

    assert_eq!(results.len(), 2);
    assert!(!results[0].is_completed());
    assert!(results[1].is_completed());

    let batches = h.mock.batches();
    assert_eq!(batches.len(), 2);
    assert!(batches[0].1.actions.iter().any(|a| a.resource().contains("N_1")));
    assert!(batches[1].1.actions.iter().any(|a| a.resource().contains("N_2")));

    assert_eq!(h.store.saves(), 2);
    let persisted = h.store.current().unwrap();
    assert!(!persisted.networks[0].settings_created);
    assert!(persisted.networks[1].settings_created);
    assert_eq!(
        h.artifacts.names(),
        vec!["create_settings_1.json".to_string(), "create_settings_2.json".to_string()]
    );
}

#[tokio::test]
async fn fun_stage_blinks_online_devices_and_sends_snapshots() {
    let mut inventory_site = site(1, "Site A");
    inventory_site.mv_serial = Some("Q2MV-0001".into());
    let mock = MockDashboard::new().with(|f| {
        for (serial, state) in [
            ("Q2MX-0001", DeviceState::Online),
            ("Q2MS-0001", DeviceState::Offline),
            ("Q2MR-0001", DeviceState::Alerting),
            ("Q2MV-0001", DeviceState::Online),
        ] {
            f.statuses.push(DeviceStatus {
                serial: serial.into(),
                name: None,
                mac: None,
                status: state,
                network_id: Some("N_1".into()),
                using_cellular_failover: None,
            });
        }
    });
    let h = harness(mock, MemoryStateStore::default());
    let mut state = DemoState::new("key", "123");
    state.networks.push(claimed_record("N_1", &inventory_site));

    let outcome = h.sequencer.fun(&state).await.unwrap();
    let StageOutcome::Fun(report) = outcome else { panic!("expected fun report") };

    assert_eq!(
        report.blinked,
        vec![DeviceRole::Gateway, DeviceRole::AccessPoint, DeviceRole::Camera]
    );
    assert!(report.camera_online);
    assert_eq!(report.snapshots_sent, 3);
    assert_eq!(h.notifier.sent().len(), 3);
}

#[tokio::test]
async fn teardown_deletes_networks_and_local_files() {
    let sites = vec![site(1, "Site A")];
    let mut state = DemoState::new("key", "123");
    state.networks.push(claimed_record("N_1", &sites[0]));
    let h = harness(MockDashboard::new(), MemoryStateStore::with_state(state.clone()));
    let inventory = InventoryFile { sites };

    // Leave a payload file behind first.
    h.sequencer.configure_settings(&mut state, &inventory).await.unwrap();
    assert!(!h.artifacts.names().is_empty());

    let report = h.sequencer.teardown(&state).await.unwrap();

    assert_eq!(report.deleted_networks, vec!["Demo Site A".to_string()]);
    assert_eq!(report.removed_files.len(), 1);
    assert_eq!(h.mock.calls_starting_with("delete_network:N_1").len(), 1);
    assert!(h.store.current().is_none());
    assert!(h.artifacts.names().is_empty());
}

#[tokio::test]
async fn load_state_refreshes_credentials() {
    let mut stored = DemoState::new("old-key", "111");
    stored.user_name = Some("Ada".into());
    let h = harness(MockDashboard::new(), MemoryStateStore::with_state(stored));

    let state = h.sequencer.load_state("new-key", "123").await.unwrap();

    assert_eq!(state.api_key, "new-key");
    assert_eq!(state.org_id, "123");
    assert_eq!(state.user(), "Ada");
}
