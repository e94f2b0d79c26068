//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for dashops
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum DashOpsError {
    /// Missing or malformed local configuration/credentials
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote API answered with a non-2xx status; `body` is the raw text
    #[error("API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An action batch reached the `failed` state; errors are verbatim
    #[error("Action batch {batch_id} failed with errors {errors:?}")]
    BatchFailed { batch_id: String, errors: Vec<String> },

    /// A bounded polling loop spent its budget without a terminal state
    #[error("Gave up waiting after {attempts} attempts")]
    PollExhausted { attempts: u32 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashOpsError {
    /// Process exit code for CLI entry points.
    ///
    /// `2` for credential/config problems, `1` for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }

    /// HTTP status of an API rejection, if this is one.
    pub fn api_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for dashops operations
pub type Result<T> = std::result::Result<T, DashOpsError>;
