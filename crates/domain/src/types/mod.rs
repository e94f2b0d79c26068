//! Domain types and models
//!
//! Wire types mirror the dashboard and messaging APIs (camelCase JSON);
//! provisioning types are the locally persisted demo progress.

mod de;

pub mod batch;
pub mod dashboard;
pub mod messaging;
pub mod provisioning;
pub mod scanning;

pub use batch::{Action, ActionBatch, ActionBatchResponse, ActionOperation, BatchState, BatchStatus};
pub use dashboard::{
    AppliancePortUpdate, ApplianceVlan, BlinkRequest, ClaimRequest, CreateNetworkRequest, Device,
    DeviceState, DeviceStatus, InventoryDevice, LossLatencySample, ManagementInterfaceUpdate,
    Network, NetworkClient, Organization, SnapshotRequest, SsidUpdate, SwitchPort,
    SwitchPortUpdate, UpdateDeviceRequest, UplinkLossLatency, UrlLink, VlansEnabledRequest,
    Wan1Settings,
};
pub use messaging::ChatMessage;
pub use provisioning::{
    DemoState, DeviceEntry, DeviceRole, InventoryFile, InventorySite, ProvisioningRecord,
    ProvisioningStage,
};
pub use scanning::{Observation, ScanKind, ScanningData, ScanningPayload};
