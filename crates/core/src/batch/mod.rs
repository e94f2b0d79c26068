//! Action batch submission and status polling

pub mod ports;
pub mod submitter;

pub use ports::ActionBatchApi;
pub use submitter::{BatchOutcome, BatchResult, BatchSubmitter};
