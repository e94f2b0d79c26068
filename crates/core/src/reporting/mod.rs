//! Health reporting sent to chat
//!
//! - [`status`]: org-wide device status tally and uplink health
//! - [`perf`]: per-appliance WAN loss/latency alerts
//! - [`always_on`]: tagged devices that are not online

pub mod always_on;
pub mod perf;
pub mod status;

pub use always_on::AlwaysOnChecker;
pub use perf::PerfChecker;
pub use status::{StatusReporter, StatusTally};
