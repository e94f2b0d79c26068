//! Action batch wire types
//!
//! An [`Action`] is one declarative `{resource, operation, body}` change; an
//! [`ActionBatch`] bundles them into a single submission that the dashboard
//! executes atomically, synchronously or in the background.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de::{null_as_empty, string_or_number};
use crate::errors::{DashOpsError, Result};
use crate::impl_domain_status_conversions;

/// Operation applied to an action's resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionOperation {
    Create,
    Update,
    Delete,
    Claim,
}

impl_domain_status_conversions!(ActionOperation {
    Create => "create",
    Update => "update",
    Delete => "delete",
    Claim => "claim",
});

/// A single declarative change. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    resource: String,
    operation: ActionOperation,
    body: Value,
}

impl Action {
    /// Build an action from any serializable body.
    ///
    /// # Errors
    /// Returns `DashOpsError::Serialization` if the body cannot be encoded.
    pub fn new(
        resource: impl Into<String>,
        operation: ActionOperation,
        body: &impl Serialize,
    ) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| DashOpsError::Serialization(format!("action body: {e}")))?;
        Ok(Self { resource: resource.into(), operation, body })
    }

    pub fn create(resource: impl Into<String>, body: &impl Serialize) -> Result<Self> {
        Self::new(resource, ActionOperation::Create, body)
    }

    pub fn update(resource: impl Into<String>, body: &impl Serialize) -> Result<Self> {
        Self::new(resource, ActionOperation::Update, body)
    }

    pub fn claim(resource: impl Into<String>, body: &impl Serialize) -> Result<Self> {
        Self::new(resource, ActionOperation::Claim, body)
    }

    /// Deletes carry an empty object body.
    pub fn delete(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            operation: ActionOperation::Delete,
            body: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn operation(&self) -> ActionOperation {
        self.operation
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

/// Submission payload; also the layout of the local payload artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionBatch {
    pub confirmed: bool,
    pub synchronous: bool,
    pub actions: Vec<Action>,
}

impl ActionBatch {
    pub fn new(confirmed: bool, synchronous: bool, actions: Vec<Action>) -> Self {
        Self { confirmed, synchronous, actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Lifecycle of a submitted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchState {
    Pending,
    Completed,
    Failed,
}

impl_domain_status_conversions!(BatchState {
    Pending => "pending",
    Completed => "completed",
    Failed => "failed",
});

/// Wire status; neither flag set means the batch is still pending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchStatus {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub failed: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<String>,
}

impl BatchStatus {
    pub fn state(&self) -> BatchState {
        if self.failed {
            BatchState::Failed
        } else if self.completed {
            BatchState::Completed
        } else {
            BatchState::Pending
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state() != BatchState::Pending
    }
}

/// Server view of a batch after creation or on lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionBatchResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub status: BatchStatus,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub synchronous: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn actions_serialize_in_wire_shape() {
        let action = Action::claim("/networks/N_1/devices", &json!({"serial": "Q2AA"})).unwrap();
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"resource": "/networks/N_1/devices", "operation": "claim", "body": {"serial": "Q2AA"}})
        );
        assert_eq!(serde_json::to_value(Action::delete("/networks/N_1/vlans/1")).unwrap()["body"], json!({}));
    }

    #[test]
    fn wire_enums_parse_and_display() {
        assert_eq!("CLAIM".parse::<ActionOperation>().unwrap(), ActionOperation::Claim);
        assert_eq!(ActionOperation::Delete.to_string(), "delete");
        assert_eq!("completed".parse::<BatchState>().unwrap(), BatchState::Completed);
        assert!("done".parse::<BatchState>().is_err());
    }

    #[test]
    fn status_flags_map_to_states() {
        assert_eq!(BatchStatus::default().state(), BatchState::Pending);
        let done: BatchStatus = serde_json::from_value(json!({"completed": true})).unwrap();
        assert_eq!(done.state(), BatchState::Completed);
        let failed: BatchStatus =
            serde_json::from_value(json!({"completed": false, "failed": true, "errors": ["VLAN exists"]})).unwrap();
        assert_eq!(failed.state(), BatchState::Failed);
        assert_eq!(failed.errors, vec!["VLAN exists".to_string()]);
    }

    #[test]
    fn response_accepts_numeric_id_and_null_errors() {
        let response: ActionBatchResponse = serde_json::from_value(json!({
            "id": 123456,
            "confirmed": true,
            "synchronous": false,
            "status": {"completed": false, "failed": false, "errors": null}
        }))
        .unwrap();
        assert_eq!(response.id, "123456");
        assert!(!response.status.is_terminal());
    }
}
