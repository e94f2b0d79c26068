//! Scripted demo provisioning
//!
//! Creates demo networks, claims their devices and configures them through
//! action batches, tracking progress in a persisted [`DemoState`].
//!
//! [`DemoState`]: dashops_domain::DemoState

pub mod actions;
pub mod policies;
pub mod ports;
pub mod sequencer;

pub use ports::{ArtifactStore, RandomTagPicker, StateStore, TagPicker};
pub use sequencer::{
    DemoStage, FunReport, ProvisioningSequencer, SkipReason, StageOutcome, TeardownReport,
};
