//! Port interfaces for action batch operations

use async_trait::async_trait;
use dashops_domain::{ActionBatch, ActionBatchResponse, Result};

/// Remote action batch endpoints of an organization.
#[async_trait]
pub trait ActionBatchApi: Send + Sync {
    /// Submit a batch. Synchronous batches come back terminal; asynchronous
    /// ones come back pending with an id to poll.
    async fn create_action_batch(
        &self,
        org_id: &str,
        batch: &ActionBatch,
    ) -> Result<ActionBatchResponse>;

    /// Look up a previously submitted batch
    async fn get_action_batch(&self, org_id: &str, batch_id: &str) -> Result<ActionBatchResponse>;
}
