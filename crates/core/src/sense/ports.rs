//! Port interface for stored scanning observations

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use dashops_domain::Result;

/// Read side of the scanning log directory.
#[async_trait]
pub trait ScanLogReader: Send + Sync {
    /// Lowercased client MACs from logs written within `window` of now.
    async fn recent_client_macs(&self, window: Duration) -> Result<HashSet<String>>;
}
