//! Chatbot-driven flows
//!
//! Each flow reports back to the requester through the [`Notifier`].
//!
//! [`Notifier`]: crate::notify_ports::Notifier

pub mod provision;
pub mod snapshots;
pub mod trigger;

pub use provision::{InventoryChoices, ProvisionBot, ProvisionForm, ProvisionOutcome, ProvisionRejection};
pub use snapshots::{wants_all_cameras, SnapshotBot};
pub use trigger::{PortOutcome, PortTrigger};
