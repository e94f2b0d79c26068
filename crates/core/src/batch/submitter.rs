//! Action batch submitter
//!
//! Submits one batch per logical change and, for asynchronous batches,
//! polls its status on a fixed interval with a bounded attempt budget.
//! Action-level errors inside a failed batch are passed through verbatim.

use std::sync::Arc;

use dashops_common::{poll_until, PollError, PollPolicy, PollStep};
use dashops_domain::{
    Action, ActionBatch, ActionBatchResponse, BatchState, BatchStatus, DashOpsError, Result,
};
use tracing::{debug, info, instrument, warn};

use super::ports::ActionBatchApi;

/// Terminal or pending state of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Pending,
    Completed,
    Failed { errors: Vec<String> },
}

impl From<&BatchStatus> for BatchOutcome {
    fn from(status: &BatchStatus) -> Self {
        match status.state() {
            BatchState::Pending => Self::Pending,
            BatchState::Completed => Self::Completed,
            BatchState::Failed => Self::Failed { errors: status.errors.clone() },
        }
    }
}

impl BatchOutcome {
    /// Operator-facing one-liner for a batch result.
    pub fn describe(&self, batch_id: &str) -> String {
        match self {
            Self::Completed => format!("Action batch {batch_id} completed!"),
            Self::Pending => format!("Action batch {batch_id} is still pending"),
            Self::Failed { errors } => {
                format!("Action batch {batch_id} failed with errors {errors:?}!")
            }
        }
    }
}

/// Server-assigned id plus the outcome known so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub batch_id: String,
    pub outcome: BatchOutcome,
}

impl BatchResult {
    fn from_response(response: &ActionBatchResponse) -> Self {
        Self { batch_id: response.id.clone(), outcome: BatchOutcome::from(&response.status) }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == BatchOutcome::Completed
    }

    /// Converts a failed outcome into `DashOpsError::BatchFailed`.
    pub fn into_completed(self) -> Result<String> {
        match self.outcome {
            BatchOutcome::Failed { errors } => {
                Err(DashOpsError::BatchFailed { batch_id: self.batch_id, errors })
            }
            _ => Ok(self.batch_id),
        }
    }
}

/// Submits action batches and waits on asynchronous ones.
pub struct BatchSubmitter {
    api: Arc<dyn ActionBatchApi>,
    policy: PollPolicy,
}

impl BatchSubmitter {
    /// Create a submitter polling with the default policy (6 x 5 s).
    pub fn new(api: Arc<dyn ActionBatchApi>) -> Self {
        Self { api, policy: PollPolicy::default() }
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Build and submit one batch.
    ///
    /// # Errors
    /// `InvalidInput` for an empty action list, raised before any request is
    /// made. API and transport failures are propagated unchanged.
    pub async fn submit(
        &self,
        org_id: &str,
        confirmed: bool,
        synchronous: bool,
        actions: Vec<Action>,
    ) -> Result<BatchResult> {
        self.submit_batch(org_id, &ActionBatch::new(confirmed, synchronous, actions)).await
    }

    /// Submit a prepared batch (e.g. one already written to a payload file).
    #[instrument(skip(self, batch), fields(actions = batch.actions.len(), synchronous = batch.synchronous))]
    pub async fn submit_batch(&self, org_id: &str, batch: &ActionBatch) -> Result<BatchResult> {
        if batch.is_empty() {
            return Err(DashOpsError::InvalidInput(
                "action batch must contain at least one action".into(),
            ));
        }

        let response = self.api.create_action_batch(org_id, batch).await?;
        let result = BatchResult::from_response(&response);
        match &result.outcome {
            BatchOutcome::Completed => info!(batch_id = %result.batch_id, "action batch completed"),
            BatchOutcome::Pending => info!(batch_id = %result.batch_id, "action batch accepted"),
            BatchOutcome::Failed { errors } => {
                warn!(batch_id = %result.batch_id, ?errors, "action batch failed");
            }
        }
        Ok(result)
    }

    /// Poll a batch until it completes or fails.
    ///
    /// # Errors
    /// `PollExhausted` when the budget runs out while still pending; lookup
    /// failures abort polling and are returned as-is.
    #[instrument(skip(self, policy))]
    pub async fn poll(
        &self,
        org_id: &str,
        batch_id: &str,
        policy: &PollPolicy,
    ) -> Result<BatchStatus> {
        let api = &self.api;
        poll_until(policy, |attempt| async move {
            let response = api.get_action_batch(org_id, batch_id).await?;
            let step = if response.status.is_terminal() {
                PollStep::Ready(response.status)
            } else {
                debug!(attempt, batch_id, "action batch still pending");
                PollStep::Pending
            };
            Ok::<_, DashOpsError>(step)
        })
        .await
        .map_err(|err| match err {
            PollError::Exhausted { attempts } => DashOpsError::PollExhausted { attempts },
            PollError::Probe { source, .. } => source,
        })
    }

    /// Submit, then poll with this submitter's policy if the batch is still
    /// pending.
    pub async fn submit_and_wait(&self, org_id: &str, batch: &ActionBatch) -> Result<BatchResult> {
        let mut result = self.submit_batch(org_id, batch).await?;
        if result.outcome == BatchOutcome::Pending {
            let status = self.poll(org_id, &result.batch_id, &self.policy).await?;
            result.outcome = BatchOutcome::from(&status);
            info!(batch_id = %result.batch_id, state = %status.state(), "action batch finished");
        }
        Ok(result)
    }
}
