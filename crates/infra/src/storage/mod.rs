//! File-backed adapters for the core persistence ports
//!
//! Everything dashops keeps locally is a plain file: the demo state JSON,
//! copies of submitted batch payloads, downloaded snapshots and the
//! scanning log directory.

mod artifacts;
mod scan_logs;
mod snapshots;
mod state_file;

pub use artifacts::FileArtifactStore;
pub use scan_logs::FileScanLogs;
pub use snapshots::HttpSnapshotDownloader;
pub use state_file::JsonStateStore;

use dashops_domain::DashOpsError;

use crate::errors::InfraError;

pub(crate) fn io_error(err: std::io::Error) -> DashOpsError {
    InfraError::from(err).into()
}
