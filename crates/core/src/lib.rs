//! # dashops Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the dashboard, chat, storage
//! - Action batch submission and polling
//! - The demo provisioning sequencer
//! - Reporting, chatbot and motion alert services
//!
//! ## Architecture Principles
//! - Only depends on `dashops-common` and `dashops-domain`
//! - No HTTP, filesystem or process code
//! - All external dependencies via traits

pub mod batch;
pub mod bot;
pub mod provisioning;
pub mod reporting;
pub mod sense;

// Infrastructure ports
pub mod dashboard_ports;
pub mod media_ports;
pub mod notify_ports;

pub use batch::{ActionBatchApi, BatchOutcome, BatchResult, BatchSubmitter};
pub use bot::{PortTrigger, ProvisionBot, SnapshotBot};
pub use dashboard_ports::DashboardApi;
pub use media_ports::SnapshotDownloader;
pub use notify_ports::Notifier;
pub use provisioning::{
    ArtifactStore, DemoStage, FunReport, ProvisioningSequencer, RandomTagPicker, SkipReason,
    StageOutcome, StateStore, TagPicker, TeardownReport,
};
pub use reporting::{AlwaysOnChecker, PerfChecker, StatusReporter};
pub use sense::{MotionAlert, MotionOutcome, ScanLogReader};
